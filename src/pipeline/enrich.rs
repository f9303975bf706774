use std::sync::atomic::Ordering;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::record::{Coordinate, GeocodedRecord, RentRecord};
use crate::pipeline::CancelFlag;

/// Seam between the enrichment loop and the geocoding client.
#[async_trait]
pub trait Geocode {
    async fn resolve(&self, address: &str) -> Option<Coordinate>;
}

/*
   Geocodes every record's address in order, one request at a time. Failed
   resolutions keep no-value coordinates and the record stays in the set;
   `on_progress(done, total)` fires after each resolution and the cancel
   flag is checked between records.
*/
pub async fn enrich<G>(
    geocoder: &G,
    records: Vec<RentRecord>,
    cancel: &CancelFlag,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<Vec<GeocodedRecord>>
where
    G: Geocode + Sync,
{
    let total = records.len();
    let mut enriched: Vec<GeocodedRecord> = Vec::with_capacity(total);

    for (index, record) in records.into_iter().enumerate() {
        if cancel.load(Ordering::Acquire) {
            return Err(Error::Cancelled);
        }

        let (latitude, longitude) = match geocoder.resolve(&record.address).await {
            Some(coordinate) => (Some(coordinate.latitude), Some(coordinate.longitude)),
            None => (None, None),
        };

        enriched.push(GeocodedRecord {
            record,
            latitude,
            longitude,
        });

        on_progress(index + 1, total);
    }

    Ok(enriched)
}
