#[cfg(test)]
mod normalization {
    use serde_json::json;

    use imdae::models::record::RawRentRecord;
    use imdae::pipeline::normalize::normalize;

    fn raw(value: serde_json::Value) -> RawRentRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_input_normalizes_to_none() {
        assert!(normalize(Vec::new(), "강남구").is_none());
    }

    #[test]
    fn numeric_coercion_is_tolerant() {
        let rows = vec![raw(json!({
            "GRFE": "1234",
            "RTFE": "abc",
            "FLR": 3,
            "RENT_AREA": "84.5",
            "MNO": "",
            "SNO": null
        }))];

        let records = normalize(rows, "강남구").unwrap();
        let record = &records[0];

        assert_eq!(record.deposit, Some(1234.0));
        assert_eq!(record.rent, None);
        assert_eq!(record.floor, Some(3.0));
        assert_eq!(record.rent_area, Some(84.5));
        assert_eq!(record.main_lot_no, None);
        assert_eq!(record.sub_lot_no, None);
    }

    #[test]
    fn unknown_fields_pass_through_unchanged() {
        let rows = vec![raw(json!({
            "STDG_NM": "역삼동",
            "RCPT_YR": "2025",
            "OPBIZ_RESTRT_SE_NM": "개업"
        }))];

        let records = normalize(rows, "강남구").unwrap();
        let record = &records[0];

        assert_eq!(record.dong_name.as_deref(), Some("역삼동"));
        assert_eq!(record.extra.get("RCPT_YR"), Some(&json!("2025")));
        assert_eq!(record.extra.get("OPBIZ_RESTRT_SE_NM"), Some(&json!("개업")));
        assert!(!record.extra.contains_key("STDG_NM"));
    }

    #[test]
    fn address_skips_zero_sub_lot() {
        let rows = vec![raw(json!({
            "STDG_NM": "역삼동",
            "LOTNO_SE_NM": "일반",
            "MNO": "123",
            "SNO": "0"
        }))];

        let records = normalize(rows, "강남구").unwrap();
        assert_eq!(records[0].address, "서울특별시 강남구 역삼동 123");
    }

    #[test]
    fn address_appends_non_zero_sub_lot() {
        let rows = vec![raw(json!({
            "STDG_NM": "역삼동",
            "LOTNO_SE_NM": "일반",
            "MNO": 123,
            "SNO": 4
        }))];

        let records = normalize(rows, "강남구").unwrap();
        assert_eq!(records[0].address, "서울특별시 강남구 역삼동 123-4");
    }

    #[test]
    fn address_marks_mountain_lots() {
        let rows = vec![raw(json!({
            "STDG_NM": "개포동",
            "LOTNO_SE_NM": "산",
            "MNO": "12"
        }))];

        let records = normalize(rows, "강남구").unwrap();
        assert_eq!(records[0].address, "서울특별시 강남구 개포동 산 12");
    }

    #[test]
    fn address_drops_unparsable_lot_numbers() {
        let rows = vec![raw(json!({
            "STDG_NM": "역삼동",
            "MNO": "없음",
            "SNO": "4"
        }))];

        // Main lot failed to parse; the sub-lot suffix still applies on its
        // own, matching the per-suffix best-effort rule.
        let records = normalize(rows, "강남구").unwrap();
        assert_eq!(records[0].address, "서울특별시 강남구 역삼동-4");
    }
}
