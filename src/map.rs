use crate::models::record::{Coordinate, GeocodedRecord};

/// Marker color category: red for 전세 (jeonse), blue for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Red,
    Blue,
}

/// One map marker with its popup fields. The rendering widget owns the
/// presentation; this is data only.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub color: MarkerColor,
    pub title: String,
    pub rent_type: Option<String>,
    pub deposit: Option<f64>,
    pub rent: Option<f64>,
    pub rent_area: Option<f64>,
    pub contract_date: Option<String>,
}

/// One marker per record with valid coordinates; records that failed
/// geocoding are skipped here but stay in tables and exports.
pub fn build_markers(records: &[GeocodedRecord]) -> Vec<Marker> {
    records
        .iter()
        .filter_map(|geocoded| {
            let position = geocoded.coordinate()?;
            let record = &geocoded.record;

            let color = if record.rent_type.as_deref() == Some("전세") {
                MarkerColor::Red
            } else {
                MarkerColor::Blue
            };

            Some(Marker {
                position,
                color,
                title: record
                    .building_name
                    .clone()
                    .unwrap_or_else(|| record.address.clone()),
                rent_type: record.rent_type.clone(),
                deposit: record.deposit,
                rent: record.rent,
                rent_area: record.rent_area,
                contract_date: record.contract_date.clone(),
            })
        })
        .collect()
}

/// Mean coordinate over the records that geocoded; None when none did.
pub fn map_center(records: &[GeocodedRecord]) -> Option<Coordinate> {
    let mut count = 0usize;
    let mut latitude_sum = 0.0;
    let mut longitude_sum = 0.0;

    for coordinate in records.iter().filter_map(|r| r.coordinate()) {
        count += 1;
        latitude_sum += coordinate.latitude;
        longitude_sum += coordinate.longitude;
    }

    if count == 0 {
        return None;
    }

    Some(Coordinate {
        latitude: latitude_sum / count as f64,
        longitude: longitude_sum / count as f64,
    })
}
