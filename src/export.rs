use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Local};
use serde_json::Value;

use crate::models::record::{GeocodedRecord, RentRecord, FIELD_LABELS};

/// Spreadsheet tools only detect UTF-8 reliably with a byte-order mark.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const ADDRESS_LABEL: &str = "주소";
const LATITUDE_LABEL: &str = "위도";
const LONGITUDE_LABEL: &str = "경도";

pub fn export_filename(at: DateTime<Local>) -> String {
    format!("서울시_임대_정보_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Writes the records to `dir` under a timestamped filename and returns the
/// full path.
pub fn export_csv(records: &[GeocodedRecord], dir: &Path, at: DateTime<Local>) -> Result<PathBuf> {
    let path = dir.join(export_filename(at));
    let file = File::create(&path)?;
    write_csv(records, BufWriter::new(file))?;
    Ok(path)
}

/*
   Column order: the renamed labels in table order, then address and
   coordinates, then the sorted union of raw fields outside the rename
   table. Missing values are empty cells; integer-valued numbers print
   without a fractional part.
*/
pub fn write_csv<W: Write>(records: &[GeocodedRecord], mut writer: W) -> Result<()> {
    writer.write_all(UTF8_BOM)?;

    let extra_keys: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.record.extra.keys().map(String::as_str))
        .collect();

    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = FIELD_LABELS.iter().map(|(_, label)| *label).collect();
    header.push(ADDRESS_LABEL);
    header.push(LATITUDE_LABEL);
    header.push(LONGITUDE_LABEL);
    header.extend(extra_keys.iter().copied());
    csv_writer.write_record(&header)?;

    for record in records {
        let mut row = labeled_cells(&record.record);
        row.push(record.record.address.clone());
        row.push(number_cell(record.latitude));
        row.push(number_cell(record.longitude));
        for key in &extra_keys {
            row.push(
                record
                    .record
                    .extra
                    .get(*key)
                    .map(extra_cell)
                    .unwrap_or_default(),
            );
        }
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn labeled_cells(record: &RentRecord) -> Vec<String> {
    vec![
        text_cell(&record.dong_name),
        text_cell(&record.lot_type_name),
        number_cell(record.main_lot_no),
        number_cell(record.sub_lot_no),
        number_cell(record.floor),
        text_cell(&record.contract_date),
        text_cell(&record.rent_type),
        number_cell(record.rent_area),
        number_cell(record.deposit),
        number_cell(record.rent),
        text_cell(&record.building_name),
        text_cell(&record.build_year),
        text_cell(&record.building_usage),
        text_cell(&record.contract_period),
        text_cell(&record.renewal_status),
        text_cell(&record.renewal_right_used),
        text_cell(&record.prior_deposit),
        text_cell(&record.prior_rent),
    ]
}

fn text_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number_cell(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => v.to_string(),
    }
}

fn extra_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
