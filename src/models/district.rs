use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

/// One row of the administrative code table: an autonomous district (자치구)
/// of Seoul. The table is loaded once at startup and only the selected pair
/// flows into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct District {
    pub code: String,
    pub name: String,
}

pub fn load_districts(path: &Path) -> Result<Vec<District>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| anyhow!("failed to open district code table {:?}: {}", path, e))?;

    let mut districts: Vec<District> = Vec::new();
    for row in reader.deserialize() {
        let district: District = row?;
        districts.push(district);
    }

    if districts.is_empty() {
        return Err(anyhow!("district code table {:?} has no rows", path));
    }

    Ok(districts)
}

/// Looks a district up by exact code or exact name.
pub fn find_district<'a>(districts: &'a [District], query: &str) -> Option<&'a District> {
    districts
        .iter()
        .find(|d| d.code == query || d.name == query)
}
