use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::record::GeocodedRecord;

lazy_static! {
    // Contract dates arrive as "20250103" or "2025-01-03" depending on the
    // dataset vintage.
    static ref CONTRACT_MONTH: Regex = Regex::new(r"^(\d{4})[-./]?(\d{2})").unwrap();
}

/// Headline numbers for one query result.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub mean_deposit: Option<f64>,
    pub mean_rent: Option<f64>,
}

/// Per-group aggregates used by the monthly and per-dong breakdowns.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub count: usize,
    pub mean_deposit: Option<f64>,
    pub mean_rent: Option<f64>,
    pub mean_area: Option<f64>,
}

pub fn summarize(records: &[GeocodedRecord]) -> Summary {
    Summary {
        total: records.len(),
        mean_deposit: mean(records.iter().filter_map(|r| r.record.deposit)),
        mean_rent: mean(records.iter().filter_map(|r| r.record.rent)),
    }
}

/// Mean deposit/rent/area per contract month, keyed "YYYY-MM". Records
/// whose contract date has no recognizable month are left out.
pub fn monthly_breakdown(records: &[GeocodedRecord]) -> BTreeMap<String, GroupStats> {
    group_by(records, |record| {
        let date = record.record.contract_date.as_deref()?;
        let captures = CONTRACT_MONTH.captures(date.trim())?;
        Some(format!("{}-{}", &captures[1], &captures[2]))
    })
}

/// Mean deposit/rent/area per legal dong.
pub fn dong_breakdown(records: &[GeocodedRecord]) -> BTreeMap<String, GroupStats> {
    group_by(records, |record| record.record.dong_name.clone())
}

fn group_by(
    records: &[GeocodedRecord],
    key_fn: impl Fn(&GeocodedRecord) -> Option<String>,
) -> BTreeMap<String, GroupStats> {
    let mut groups: BTreeMap<String, Vec<&GeocodedRecord>> = BTreeMap::new();

    for record in records {
        if let Some(key) = key_fn(record) {
            groups.entry(key).or_default().push(record);
        }
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let stats = GroupStats {
                count: members.len(),
                mean_deposit: mean(members.iter().filter_map(|r| r.record.deposit)).map(round2),
                mean_rent: mean(members.iter().filter_map(|r| r.record.rent)).map(round2),
                mean_area: mean(members.iter().filter_map(|r| r.record.rent_area)).map(round2),
            };
            (key, stats)
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut count = 0usize;
    let mut sum = 0.0;

    for value in values {
        count += 1;
        sum += value;
    }

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
