//! Loading the phase-parameter table from CSV

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use super::{ConfigError, PhaseDefinition, PhaseKind, PhaseTable};
use crate::error::TraitError;

/// Columns the parameter table must declare, in canonical order
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "PeakName",
    "PeakRange",
    "BaselineTime",
    "MinHeightRatio",
    "MinPeakLength",
    "BaselineOrPeak",
    "NegativePeak",
    "CalculateSIorII",
];

/// A raw parameter row; cells are interpreted in [`PhaseRow::into_definition`]
#[derive(Deserialize, Debug, Clone)]
struct PhaseRow {
    #[serde(rename = "PeakName")]
    peak_name: String,
    #[serde(rename = "PeakRange")]
    peak_range: String,
    #[serde(rename = "BaselineTime")]
    baseline_time: String,
    #[serde(rename = "MinHeightRatio")]
    min_height_ratio: String,
    #[serde(rename = "MinPeakLength")]
    min_peak_length: String,
    #[serde(rename = "BaselineOrPeak")]
    baseline_or_peak: String,
    #[serde(rename = "NegativePeak")]
    negative_peak: String,
    #[serde(rename = "CalculateSIorII")]
    calculate_index: String,
}

impl PhaseRow {
    fn into_definition(self, row: usize) -> Result<PhaseDefinition, TraitError> {
        let kind = PhaseKind::parse(&self.baseline_or_peak).ok_or_else(|| {
            invalid(row, "BaselineOrPeak", &self.baseline_or_peak, "Baseline or Peak")
        })?;
        let name = self.peak_name.trim().to_string();

        match kind {
            // Peak-only columns are not consulted for baseline phases
            PhaseKind::Baseline => PhaseDefinition::baseline(name, &self.baseline_time),
            PhaseKind::Peak => {
                if self.peak_range.trim().is_empty() {
                    return Err(ConfigError::MissingPeakRange { phase: name }.into());
                }
                let ratio = self.min_height_ratio.trim().parse::<f64>().map_err(|_| {
                    invalid(row, "MinHeightRatio", &self.min_height_ratio, "a number in [0, 1]")
                })?;
                let length = parse_length(&self.min_peak_length).ok_or_else(|| {
                    invalid(
                        row,
                        "MinPeakLength",
                        &self.min_peak_length,
                        "a non-negative integer",
                    )
                })?;
                let negative = parse_bool(&self.negative_peak)
                    .ok_or_else(|| invalid(row, "NegativePeak", &self.negative_peak, "a boolean"))?;
                let index = parse_bool(&self.calculate_index).ok_or_else(|| {
                    invalid(row, "CalculateSIorII", &self.calculate_index, "a boolean")
                })?;

                Ok(
                    PhaseDefinition::peak(name, &self.peak_range, &self.baseline_time)?
                        .with_min_height_ratio(ratio)
                        .with_min_peak_length(length)
                        .with_negative_peak(negative)
                        .with_index(index),
                )
            }
        }
    }
}

fn invalid(row: usize, column: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Interpret a boolean-coercible cell; empty means `false`
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" | "1.0" => Some(true),
        "false" | "f" | "no" | "n" | "0" | "0.0" | "" => Some(false),
        _ => None,
    }
}

/// Interpret a sample count written as `3` or `3.0`
fn parse_length(value: &str) -> Option<usize> {
    let value = value.trim();
    if let Ok(n) = value.parse::<usize>() {
        return Some(n);
    }
    let x = value.parse::<f64>().ok()?;
    if x >= 0.0 && x.fract() == 0.0 && x.is_finite() {
        Some(x as usize)
    } else {
        None
    }
}

impl PhaseTable {
    /// Read a phase-parameter CSV file
    ///
    /// The header row must contain every name in [`REQUIRED_COLUMNS`]; other
    /// columns are ignored. Rows become phases in file order.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use perifusion::phase::PhaseTable;
    ///
    /// let phases = PhaseTable::from_path("parameter/INS_IEQ_parameter.csv").unwrap();
    /// println!("{} phases", phases.len());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::Headers)
            .from_path(path)?;
        Self::parse(reader)
    }

    /// Read a phase-parameter table from any CSV reader
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingColumns`] before any row is read if a required
    ///   column is absent
    /// - [`ConfigError`] for an uninterpretable cell
    /// - [`TraitError::Parse`] for a malformed range specification
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TraitError> {
        let reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        Self::parse(reader)
    }

    fn parse<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, TraitError> {
        let headers = reader.headers()?.clone();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !headers.iter().any(|h| h == **required))
            .map(|s| s.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingColumns { missing }.into());
        }

        let mut phases = Vec::new();
        for (idx, result) in reader.deserialize::<PhaseRow>().enumerate() {
            let row: PhaseRow = result?;
            phases.push(row.into_definition(idx + 1)?);
        }

        let table = PhaseTable::new(phases)?;
        tracing::debug!(phases = table.len(), "read phase-parameter table");
        Ok(table)
    }
}
