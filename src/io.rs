//! CSV loading of study records and export of the study table

use crate::Result;
use meta_pooling::{AggregatedStudyTable, StudyRecord, StudyRow};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Input row as found in a source table
///
/// Cells that are empty or not numbers (`NA`, `-`) become missing values
/// instead of failing the whole file.
#[derive(Debug, Deserialize)]
struct CsvStudyRecord {
    #[serde(rename = "Authors")]
    authors: String,
    #[serde(rename = "MCI_Mean", deserialize_with = "csv::invalid_option")]
    group1_mean: Option<f64>,
    #[serde(rename = "Control_Mean", deserialize_with = "csv::invalid_option")]
    group2_mean: Option<f64>,
    #[serde(rename = "MCI_SD", deserialize_with = "csv::invalid_option")]
    group1_sd: Option<f64>,
    #[serde(rename = "Control_SD", deserialize_with = "csv::invalid_option")]
    group2_sd: Option<f64>,
    #[serde(rename = "MCI_size", deserialize_with = "csv::invalid_option")]
    group1_size: Option<f64>,
    #[serde(rename = "Control_size", deserialize_with = "csv::invalid_option")]
    group2_size: Option<f64>,
    #[serde(rename = "MMSE_score", default, deserialize_with = "csv::invalid_option")]
    auxiliary_score: Option<f64>,
}

impl From<CsvStudyRecord> for StudyRecord {
    fn from(raw: CsvStudyRecord) -> Self {
        StudyRecord {
            authors: raw.authors,
            group1_mean: raw.group1_mean,
            group2_mean: raw.group2_mean,
            group1_sd: raw.group1_sd,
            group2_sd: raw.group2_sd,
            group1_size: raw.group1_size,
            group2_size: raw.group2_size,
            auxiliary_score: raw.auxiliary_score,
        }
    }
}

/// Exported row of the study table
#[derive(Debug, Serialize)]
struct CsvStudyRow<'a> {
    #[serde(rename = "Author")]
    author: &'a str,
    #[serde(rename = "CI95inf")]
    ci_lower: f64,
    d: f64,
    #[serde(rename = "CI95sup")]
    ci_upper: f64,
    #[serde(rename = "Weight")]
    weight: f64,
    #[serde(rename = "Var")]
    variance: f64,
    #[serde(rename = "MCI_size")]
    group1_size: f64,
    #[serde(rename = "Control_size")]
    group2_size: f64,
    #[serde(rename = "MMSE_score")]
    auxiliary_score: Option<f64>,
    #[serde(rename = "Role")]
    role: String,
}

impl<'a> From<&'a StudyRow> for CsvStudyRow<'a> {
    fn from(row: &'a StudyRow) -> Self {
        Self {
            author: &row.author,
            ci_lower: row.ci_lower,
            d: row.d,
            ci_upper: row.ci_upper,
            weight: row.weight,
            variance: row.variance,
            group1_size: row.group1_size,
            group2_size: row.group2_size,
            auxiliary_score: row.auxiliary_score,
            role: row.role.to_string(),
        }
    }
}

/// Read study records from CSV with a header row
///
/// Columns are matched by name: `Authors`, `MCI_Mean`, `Control_Mean`,
/// `MCI_SD`, `Control_SD`, `MCI_size`, `Control_size` and the optional
/// `MMSE_score`. Extra columns are ignored.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<StudyRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let records = csv_reader
        .deserialize::<CsvStudyRecord>()
        .map(|row| row.map(StudyRecord::from))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!(records = records.len(), "read study records");
    Ok(records)
}

/// Read study records from a CSV file
pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<Vec<StudyRecord>> {
    let file = std::fs::File::open(path)?;
    read_records(file)
}

/// Write the study table as CSV, one row per table row in table order
pub fn write_study_table<W: Write>(table: &AggregatedStudyTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in table {
        csv_writer.serialize(CsvStudyRow::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the study table to a CSV file
pub fn write_study_table_to_path(table: &AggregatedStudyTable, path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_study_table(table, file)
}
