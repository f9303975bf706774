use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::district::District;

/// Raw field code -> human-readable column label, in export column order.
/// Raw fields outside this table pass through under their original code.
pub const FIELD_LABELS: &[(&str, &str)] = &[
    ("STDG_NM", "법정동명"),
    ("LOTNO_SE_NM", "지번구분명"),
    ("MNO", "본번"),
    ("SNO", "부번"),
    ("FLR", "층"),
    ("CTRT_DAY", "계약일"),
    ("RENT_SE", "전월세구분"),
    ("RENT_AREA", "임대면적(㎡)"),
    ("GRFE", "보증금(만원)"),
    ("RTFE", "임대료(만원)"),
    ("BLDG_NM", "건물명"),
    ("ARCH_YR", "건축년도"),
    ("BLDG_USG", "건물용도"),
    ("CTRT_PRD", "계약기간"),
    ("NEW_UPDT_YN", "신규갱신여부"),
    ("CTRT_UPDT_USE_YN", "계약갱신권사용여부"),
    ("BFR_GRFE", "종전보증금"),
    ("BFR_RTFE", "종전임대료"),
];

/*
   One row exactly as the open-data API returns it. The API is loose with
   types (numeric fields arrive as strings or bare numbers depending on the
   row), so values stay untyped until normalization.
*/
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRentRecord(pub Map<String, Value>);

impl RawRentRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

/// A normalized rental contract: typed columns under their renamed labels
/// plus the derived lot-number address. Missing or unparsable numeric
/// values are `None`, never zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RentRecord {
    pub dong_name: Option<String>,
    pub lot_type_name: Option<String>,
    pub main_lot_no: Option<f64>,
    pub sub_lot_no: Option<f64>,
    pub floor: Option<f64>,
    pub contract_date: Option<String>,
    pub rent_type: Option<String>,
    pub rent_area: Option<f64>,
    pub deposit: Option<f64>,
    pub rent: Option<f64>,
    pub building_name: Option<String>,
    pub build_year: Option<String>,
    pub building_usage: Option<String>,
    pub contract_period: Option<String>,
    pub renewal_status: Option<String>,
    pub renewal_right_used: Option<String>,
    pub prior_deposit: Option<String>,
    pub prior_rent: Option<String>,
    pub address: String,
    /// Raw fields outside the rename table, carried through to export.
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A rental contract with its geocoding result. Records whose address did
/// not resolve keep `None` coordinates; they stay in tables and exports but
/// are skipped by map-marker preparation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedRecord {
    pub record: RentRecord,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeocodedRecord {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Everything one district query produced. Held by the caller and passed by
/// reference into filtering, stats and export; nothing lives in globals.
#[derive(Debug, Clone)]
pub struct RentDataset {
    pub district: District,
    pub records: Vec<GeocodedRecord>,
    pub collected_at: DateTime<Local>,
}
