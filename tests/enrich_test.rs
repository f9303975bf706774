#[cfg(test)]
mod enrichment {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use async_trait::async_trait;

    use imdae::error::Error;
    use imdae::map::{build_markers, map_center, MarkerColor};
    use imdae::models::record::{Coordinate, RentRecord};
    use imdae::pipeline::enrich::{enrich, Geocode};
    use imdae::pipeline::CancelFlag;

    const MISSING_ADDRESS: &str = "존재하지않는주소999";

    /// Resolves everything to one fixed point except the known-missing
    /// address.
    struct StubGeocoder;

    #[async_trait]
    impl Geocode for StubGeocoder {
        async fn resolve(&self, address: &str) -> Option<Coordinate> {
            if address.contains(MISSING_ADDRESS) {
                None
            } else {
                Some(Coordinate {
                    latitude: 37.5,
                    longitude: 127.03,
                })
            }
        }
    }

    fn record(address: &str, rent_type: &str) -> RentRecord {
        RentRecord {
            address: address.to_string(),
            rent_type: Some(rent_type.to_string()),
            deposit: Some(1000.0),
            rent: Some(50.0),
            ..Default::default()
        }
    }

    fn fresh_cancel() -> CancelFlag {
        Arc::new(AtomicBool::new(false))
    }

    #[tokio::test]
    async fn failed_geocoding_keeps_the_record_with_no_coordinates() {
        let records = vec![
            record("서울특별시 강남구 역삼동 123", "전세"),
            record(MISSING_ADDRESS, "월세"),
        ];

        let mut progress: Vec<(usize, usize)> = Vec::new();
        let enriched = enrich(&StubGeocoder, records, &fresh_cancel(), |done, total| {
            progress.push((done, total))
        })
        .await
        .unwrap();

        assert_eq!(enriched.len(), 2);
        assert_eq!(progress, vec![(1, 2), (2, 2)]);

        assert!(enriched[0].coordinate().is_some());
        assert_eq!(enriched[1].latitude, None);
        assert_eq!(enriched[1].longitude, None);
    }

    #[tokio::test]
    async fn unresolved_records_are_excluded_from_markers_and_centroid() {
        let records = vec![
            record("서울특별시 강남구 역삼동 123", "전세"),
            record(MISSING_ADDRESS, "월세"),
        ];

        let enriched = enrich(&StubGeocoder, records, &fresh_cancel(), |_, _| {})
            .await
            .unwrap();

        let markers = build_markers(&enriched);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].color, MarkerColor::Red);

        let center = map_center(&enriched).unwrap();
        assert_eq!(center.latitude, 37.5);
        assert_eq!(center.longitude, 127.03);
    }

    #[tokio::test]
    async fn wolse_markers_are_blue_and_title_falls_back_to_address() {
        let records = vec![record("서울특별시 마포구 합정동 7", "월세")];

        let enriched = enrich(&StubGeocoder, records, &fresh_cancel(), |_, _| {})
            .await
            .unwrap();

        let markers = build_markers(&enriched);
        assert_eq!(markers[0].color, MarkerColor::Blue);
        assert_eq!(markers[0].title, "서울특별시 마포구 합정동 7");
    }

    #[tokio::test]
    async fn no_valid_coordinates_means_no_centroid() {
        let records = vec![record(MISSING_ADDRESS, "월세")];

        let enriched = enrich(&StubGeocoder, records, &fresh_cancel(), |_, _| {})
            .await
            .unwrap();

        assert!(map_center(&enriched).is_none());
        assert!(build_markers(&enriched).is_empty());
    }

    #[tokio::test]
    async fn pre_set_cancel_flag_stops_enrichment() {
        let records = vec![record("서울특별시 강남구 역삼동 123", "전세")];
        let cancel = Arc::new(AtomicBool::new(true));

        let err = enrich(&StubGeocoder, records, &cancel, |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
