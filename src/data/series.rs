//! Perifusion input data: one shared time axis and one secretion column per donor
//!
//! [`PerifusionData`] is the validated, analysis-ready form of a perifusion sheet.
//! Construction locates the time column, checks that every donor column has one
//! value per time point and normalizes missing samples (NaN, empty cells) to `None`.
//!
//! # Example
//!
//! ```rust
//! use perifusion::data::PerifusionData;
//!
//! let data = PerifusionData::builder(vec![1.0, 2.0, 3.0])
//!     .donor("R001", vec![0.5, 0.6, 0.7])
//!     .donor("R002", vec![0.4, f64::NAN, 0.6])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(data.donor_ids(), vec!["R001", "R002"]);
//! assert!(data.donor("R002").unwrap().has_missing());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Name fragment identifying the time column (matched case-insensitively)
pub const TIME_COLUMN_PATTERN: &str = "time";

/// Errors describing an input table that cannot be analysed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// No column name contains "time"
    #[error("No column containing 'time' found among {columns:?}")]
    MissingTimeColumn {
        /// All column names of the table
        columns: Vec<String>,
    },

    /// More than one column name contains "time"
    #[error("Ambiguous time column: {candidates:?} all contain 'time'")]
    AmbiguousTimeColumn {
        /// The matching column names
        candidates: Vec<String>,
    },

    /// A donor column does not have one value per time point
    #[error("Column '{column}' has {found} values, expected {expected}")]
    LengthMismatch {
        /// The offending column
        column: String,
        /// Length of the time axis
        expected: usize,
        /// Length of the column
        found: usize,
    },

    /// Two columns share a name
    #[error("Duplicate column '{name}'")]
    DuplicateColumn {
        /// The duplicated name
        name: String,
    },
}

/// An ordered sequence of `(time, value)` pairs with no missing values
///
/// Times are expected in ascending order and may be unevenly spaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series from parallel time and value vectors
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::LengthMismatch`] if the vectors differ in length.
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Result<Self, SchemaError> {
        if times.len() != values.len() {
            return Err(SchemaError::LengthMismatch {
                column: "values".to_string(),
                expected: times.len(),
                found: values.len(),
            });
        }
        Ok(Self { times, values })
    }

    /// Time points
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Values, parallel to [`times`](Self::times)
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the series has no samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterate over `(time, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}

/// Secretion values of one donor, aligned with the shared time axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorSeries {
    id: String,
    values: Vec<Option<f64>>,
}

impl DonorSeries {
    fn new(id: String, values: Vec<Option<f64>>) -> Self {
        // NaN is treated exactly like an absent sample
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Self { id, values }
    }

    /// Donor identifier (the column name)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw values; `None` marks a missing sample
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Whether any sample is missing
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Option::is_none)
    }

    /// All values, or `None` if any sample is missing
    pub fn complete_values(&self) -> Option<Vec<f64>> {
        self.values.iter().copied().collect()
    }
}

/// A validated perifusion table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerifusionData {
    time_column: String,
    times: Vec<f64>,
    donors: Vec<DonorSeries>,
}

impl PerifusionData {
    /// Create a builder from a time axis
    pub fn builder(times: Vec<f64>) -> PerifusionDataBuilder {
        PerifusionDataBuilder::new(times)
    }

    /// Build from named columns; NaN marks a missing sample
    ///
    /// Exactly one column name must contain "time" (case-insensitive); every other
    /// column is a donor, kept in input order.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the time column cannot be identified, a column
    /// has the wrong length, or two donor columns share a name.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self, SchemaError> {
        Self::from_optional_columns(
            columns
                .into_iter()
                .map(|(name, values)| (name, values.into_iter().map(Some).collect()))
                .collect(),
        )
    }

    /// Build from named columns where `None` marks a missing sample
    ///
    /// Missing time values are stored as NaN and never match a range.
    ///
    /// # Errors
    ///
    /// See [`from_columns`](Self::from_columns).
    pub fn from_optional_columns<S: Into<String>>(
        columns: Vec<(S, Vec<Option<f64>>)>,
    ) -> Result<Self, SchemaError> {
        let mut columns: Vec<(String, Vec<Option<f64>>)> = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .collect();

        let time_idx = find_time_column(columns.iter().map(|(name, _)| name.as_str()))?;

        let (time_column, time_values) = columns.remove(time_idx);
        let times: Vec<f64> = time_values
            .into_iter()
            .map(|t| t.unwrap_or(f64::NAN))
            .collect();

        let mut seen = HashSet::new();
        let mut donors = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if values.len() != times.len() {
                return Err(SchemaError::LengthMismatch {
                    column: name,
                    expected: times.len(),
                    found: values.len(),
                });
            }
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateColumn { name });
            }
            donors.push(DonorSeries::new(name, values));
        }

        Ok(Self {
            time_column,
            times,
            donors,
        })
    }

    /// Name of the column used as the time axis
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// The shared time axis
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// All donors, in column order
    pub fn donors(&self) -> &[DonorSeries] {
        &self.donors
    }

    /// Donor identifiers, in column order
    pub fn donor_ids(&self) -> Vec<&str> {
        self.donors.iter().map(DonorSeries::id).collect()
    }

    /// Look up a donor by identifier
    pub fn donor(&self, id: &str) -> Option<&DonorSeries> {
        self.donors.iter().find(|d| d.id == id)
    }

    /// The complete [`TimeSeries`] of a donor
    ///
    /// Returns `None` for an unknown donor or a donor with any missing sample.
    pub fn series(&self, id: &str) -> Option<TimeSeries> {
        let values = self.donor(id)?.complete_values()?;
        Some(TimeSeries {
            times: self.times.clone(),
            values,
        })
    }

    /// Number of donors
    pub fn len(&self) -> usize {
        self.donors.len()
    }

    /// Whether the table has no donor columns
    pub fn is_empty(&self) -> bool {
        self.donors.is_empty()
    }
}

/// Index of the single column whose name contains "time"
pub(crate) fn find_time_column<'a>(
    names: impl Iterator<Item = &'a str>,
) -> Result<usize, SchemaError> {
    let names: Vec<&str> = names.collect();
    let candidates: Vec<usize> = names
        .iter()
        .enumerate()
        .filter(|(_, name)| name.to_lowercase().contains(TIME_COLUMN_PATTERN))
        .map(|(i, _)| i)
        .collect();

    match candidates.as_slice() {
        [idx] => Ok(*idx),
        [] => Err(SchemaError::MissingTimeColumn {
            columns: names.iter().map(|s| s.to_string()).collect(),
        }),
        _ => Err(SchemaError::AmbiguousTimeColumn {
            candidates: candidates.iter().map(|&i| names[i].to_string()).collect(),
        }),
    }
}

/// Builder for [`PerifusionData`]
#[derive(Debug, Clone)]
pub struct PerifusionDataBuilder {
    times: Vec<f64>,
    donors: Vec<(String, Vec<Option<f64>>)>,
}

impl PerifusionDataBuilder {
    fn new(times: Vec<f64>) -> Self {
        Self {
            times,
            donors: Vec::new(),
        }
    }

    /// Add a donor column; NaN marks a missing sample
    pub fn donor(mut self, id: impl Into<String>, values: Vec<f64>) -> Self {
        self.donors
            .push((id.into(), values.into_iter().map(Some).collect()));
        self
    }

    /// Add a donor column with explicit missing samples
    pub fn donor_with_missing(mut self, id: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.donors.push((id.into(), values));
        self
    }

    /// Validate and build the table
    ///
    /// # Errors
    ///
    /// See [`PerifusionData::from_columns`]. A donor named like the time column
    /// makes the time column ambiguous.
    pub fn build(self) -> Result<PerifusionData, SchemaError> {
        let mut columns = Vec::with_capacity(self.donors.len() + 1);
        columns.push((
            TIME_COLUMN_PATTERN.to_string(),
            self.times.into_iter().map(Some).collect(),
        ));
        columns.extend(self.donors);
        PerifusionData::from_optional_columns(columns)
    }
}
