use crate::models::record::GeocodedRecord;

/// A closed numeric interval, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub min: f64,
    pub max: f64,
}

impl RangeFilter {
    pub fn new(min: f64, max: f64) -> RangeFilter {
        if min <= max {
            RangeFilter { min, max }
        } else {
            RangeFilter { min: max, max: min }
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Active range predicates. The period range is only present when the
/// dataset carries at least one parseable contract-period value.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub deposit: RangeFilter,
    pub rent: RangeFilter,
    pub period: Option<RangeFilter>,
}

impl FilterCriteria {
    /*
       Default criteria: min/max over the values actually present in the
       data, so the unfiltered result keeps every record with a value.
    */
    pub fn from_records(records: &[GeocodedRecord]) -> FilterCriteria {
        FilterCriteria {
            deposit: range_over(records.iter().filter_map(|r| r.record.deposit)),
            rent: range_over(records.iter().filter_map(|r| r.record.rent)),
            period: period_range(records),
        }
    }
}

fn range_over(values: impl Iterator<Item = f64>) -> RangeFilter {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for value in values {
        min = min.min(value);
        max = max.max(value);
    }

    if min > max {
        // No values at all; an empty range excludes nothing it could keep.
        RangeFilter::new(0.0, 0.0)
    } else {
        RangeFilter::new(min, max)
    }
}

fn period_range(records: &[GeocodedRecord]) -> Option<RangeFilter> {
    let mut values = records
        .iter()
        .filter_map(|r| r.record.contract_period.as_deref().and_then(parse_period))
        .peekable();

    values.peek()?;
    Some(range_over(values))
}

/// Contract periods are free-text; only values that trim-parse to a finite
/// number take part in period filtering.
pub fn parse_period(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/*
   Inclusive range membership on deposit and rent; no-value fails the test.
   When a period range is active, unparsable periods are excluded too.
   Order-preserving and idempotent.
*/
pub fn filter_records(records: &[GeocodedRecord], criteria: &FilterCriteria) -> Vec<GeocodedRecord> {
    records
        .iter()
        .filter(|r| matches_criteria(r, criteria))
        .cloned()
        .collect()
}

fn matches_criteria(record: &GeocodedRecord, criteria: &FilterCriteria) -> bool {
    let deposit_ok = record
        .record
        .deposit
        .map_or(false, |v| criteria.deposit.contains(v));

    let rent_ok = record
        .record
        .rent
        .map_or(false, |v| criteria.rent.contains(v));

    let period_ok = match &criteria.period {
        None => true,
        Some(range) => record
            .record
            .contract_period
            .as_deref()
            .and_then(parse_period)
            .map_or(false, |v| range.contains(v)),
    };

    deposit_ok && rent_ok && period_ok
}
