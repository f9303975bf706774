#[cfg(test)]
mod csv_export {
    use std::collections::HashMap;

    use chrono::Local;
    use serde_json::json;
    use tempfile::tempdir;

    use imdae::export::{export_csv, export_filename, write_csv};
    use imdae::models::record::{GeocodedRecord, RentRecord};

    fn record(deposit: Option<f64>, rent: Option<f64>, geocoded: bool) -> GeocodedRecord {
        let mut extra = serde_json::Map::new();
        extra.insert("RCPT_YR".to_string(), json!("2025"));

        GeocodedRecord {
            record: RentRecord {
                dong_name: Some("역삼동".to_string()),
                address: "서울특별시 강남구 역삼동 123".to_string(),
                deposit,
                rent,
                extra,
                ..Default::default()
            },
            latitude: geocoded.then_some(37.5),
            longitude: geocoded.then_some(127.03),
        }
    }

    fn rendered(records: &[GeocodedRecord]) -> Vec<u8> {
        let mut buffer: Vec<u8> = Vec::new();
        write_csv(records, &mut buffer).unwrap();
        buffer
    }

    #[test]
    fn output_starts_with_a_utf8_bom() {
        let buffer = rendered(&[record(Some(1000.0), Some(50.0), true)]);
        assert_eq!(&buffer[..3], [0xEF, 0xBB, 0xBF]);
    }

    #[test]
    fn round_trip_preserves_rows_and_deposit_rent_pairs() {
        let records = vec![
            record(Some(1000.0), Some(50.0), true),
            record(Some(2500.0), None, false),
            record(None, Some(80.5), true),
        ];
        let buffer = rendered(&records);

        let mut reader = csv::Reader::from_reader(&buffer[3..]);
        let headers = reader.headers().unwrap().clone();
        let deposit_idx = headers.iter().position(|h| h == "보증금(만원)").unwrap();
        let rent_idx = headers.iter().position(|h| h == "임대료(만원)").unwrap();

        let mut pairs: HashMap<(String, String), usize> = HashMap::new();
        let mut rows = 0;
        for row in reader.records() {
            let row = row.unwrap();
            rows += 1;
            *pairs
                .entry((row[deposit_idx].to_string(), row[rent_idx].to_string()))
                .or_default() += 1;
        }

        assert_eq!(rows, records.len());
        assert_eq!(pairs.get(&("1000".to_string(), "50".to_string())), Some(&1));
        assert_eq!(pairs.get(&("2500".to_string(), String::new())), Some(&1));
        assert_eq!(pairs.get(&(String::new(), "80.5".to_string())), Some(&1));
    }

    #[test]
    fn ungeocodable_records_still_appear_with_empty_coordinates() {
        let buffer = rendered(&[record(Some(1000.0), Some(50.0), false)]);

        let mut reader = csv::Reader::from_reader(&buffer[3..]);
        let headers = reader.headers().unwrap().clone();
        let lat_idx = headers.iter().position(|h| h == "위도").unwrap();
        let lon_idx = headers.iter().position(|h| h == "경도").unwrap();

        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[lat_idx], "");
        assert_eq!(&row[lon_idx], "");
    }

    #[test]
    fn extra_raw_fields_become_trailing_columns() {
        let buffer = rendered(&[record(Some(1000.0), Some(50.0), true)]);

        let mut reader = csv::Reader::from_reader(&buffer[3..]);
        let headers = reader.headers().unwrap().clone();
        let extra_idx = headers.iter().position(|h| h == "RCPT_YR").unwrap();
        assert!(extra_idx > headers.iter().position(|h| h == "경도").unwrap());

        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[extra_idx], "2025");
    }

    #[test]
    fn export_writes_a_timestamped_file() {
        let dir = tempdir().unwrap();
        let at = Local::now();

        let path = export_csv(&[record(Some(1000.0), Some(50.0), true)], dir.path(), at).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            export_filename(at)
        );
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("서울시_임대_정보_") && name.ends_with(".csv"));
        assert!(path.exists());
    }
}
