use serde_json::{Map, Value};

use crate::models::record::{RawRentRecord, RentRecord};

/*
   Converts raw API rows into typed records: numeric coercion on the fixed
   field set, renaming into the labeled struct fields, and the derived
   lot-number address. Returns None on empty input.
*/
pub fn normalize(rows: Vec<RawRentRecord>, district_name: &str) -> Option<Vec<RentRecord>> {
    if rows.is_empty() {
        return None;
    }

    Some(
        rows.into_iter()
            .map(|row| normalize_row(row, district_name))
            .collect(),
    )
}

fn normalize_row(row: RawRentRecord, district_name: &str) -> RentRecord {
    let map = row.0;
    let mut record = RentRecord::default();
    let mut extra: Map<String, Value> = Map::new();

    for (field, value) in map {
        match field.as_str() {
            "STDG_NM" => record.dong_name = text_value(&value),
            "LOTNO_SE_NM" => record.lot_type_name = text_value(&value),
            "MNO" => record.main_lot_no = numeric_value(&value),
            "SNO" => record.sub_lot_no = numeric_value(&value),
            "FLR" => record.floor = numeric_value(&value),
            "CTRT_DAY" => record.contract_date = text_value(&value),
            "RENT_SE" => record.rent_type = text_value(&value),
            "RENT_AREA" => record.rent_area = numeric_value(&value),
            "GRFE" => record.deposit = numeric_value(&value),
            "RTFE" => record.rent = numeric_value(&value),
            "BLDG_NM" => record.building_name = text_value(&value),
            "ARCH_YR" => record.build_year = text_value(&value),
            "BLDG_USG" => record.building_usage = text_value(&value),
            "CTRT_PRD" => record.contract_period = text_value(&value),
            "NEW_UPDT_YN" => record.renewal_status = text_value(&value),
            "CTRT_UPDT_USE_YN" => record.renewal_right_used = text_value(&value),
            "BFR_GRFE" => record.prior_deposit = text_value(&value),
            "BFR_RTFE" => record.prior_rent = text_value(&value),
            _ => {
                extra.insert(field, value);
            }
        }
    }

    record.extra = extra;
    record.address = derive_address(district_name, &record);
    record
}

// Tolerant coercion: bare numbers pass through, strings are trimmed and
// parsed, everything else (including non-finite parses) is no-value.
// Never zero, never an error.
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/*
   "서울특별시 <district> <dong>", then " 산" for mountain lots, then the
   integer main lot number and "-<sub>" when the sub lot is non-zero. Each
   suffix is independent and best-effort; a missing or unparsable part is
   simply dropped.
*/
pub fn derive_address(district_name: &str, record: &RentRecord) -> String {
    let mut address = format!("서울특별시 {}", district_name);

    if let Some(dong) = &record.dong_name {
        address.push(' ');
        address.push_str(dong);
    }

    if record.lot_type_name.as_deref() == Some("산") {
        address.push_str(" 산");
    }

    if let Some(main) = record.main_lot_no {
        address.push_str(&format!(" {}", main as i64));
    }

    if let Some(sub) = record.sub_lot_no {
        if sub != 0.0 {
            address.push_str(&format!("-{}", sub as i64));
        }
    }

    address
}
