//! Phase definitions: the declarative table driving trait extraction
//!
//! Each [`PhaseDefinition`] names one experimental window of a perifusion run and
//! says how to summarise it:
//!
//! - a **baseline** phase reports the mean secretion over its baseline window;
//! - a **peak** phase corrects the curve inside a single interval against the mean
//!   of its baseline window, integrates the qualifying peaks (AUC) and can report a
//!   stimulation or inhibition index.
//!
//! Range specifications are parsed once, when the definition is created, so a
//! malformed range fails before any donor is processed.
//!
//! # Example
//!
//! ```rust
//! use perifusion::phase::{PhaseDefinition, PhaseTable};
//!
//! let phases = PhaseTable::new(vec![
//!     PhaseDefinition::baseline("Basal Secretion", "3-9").unwrap(),
//!     PhaseDefinition::peak("G 16.7", "9-63", "3-9")
//!         .unwrap()
//!         .with_min_height_ratio(0.1)
//!         .with_min_peak_length(3)
//!         .with_index(true),
//! ])
//! .unwrap();
//!
//! assert_eq!(phases.len(), 2);
//! ```

mod table;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::data::range::{Interval, RangeSpec};
use crate::error::TraitError;

pub use table::REQUIRED_COLUMNS;

/// Default minimum peak height relative to the curve maximum
pub const DEFAULT_MIN_HEIGHT_RATIO: f64 = 0.10;
/// Default minimum number of consecutive samples forming a peak
pub const DEFAULT_MIN_PEAK_LENGTH: usize = 3;

/// Errors in the phase-parameter table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Required columns are absent from the parameter table
    #[error("Missing required columns in parameter table: {missing:?}")]
    MissingColumns {
        /// The absent column names, in canonical order
        missing: Vec<String>,
    },

    /// A cell could not be interpreted
    #[error("Invalid value '{value}' in column {column} (row {row}): expected {expected}")]
    InvalidValue {
        /// 1-based data row number
        row: usize,
        /// Column name
        column: String,
        /// The raw cell content
        value: String,
        /// What the column accepts
        expected: &'static str,
    },

    /// A peak phase has no peak range
    #[error("Peak phase '{phase}' has no peak range")]
    MissingPeakRange {
        /// Phase name
        phase: String,
    },

    /// A peak phase range is a point or a union instead of one `a-b` interval
    #[error("Peak range '{range}' of phase '{phase}' must be a single 'start-end' interval")]
    PeakRangeNotInterval {
        /// Phase name
        phase: String,
        /// The offending range
        range: String,
    },

    /// The minimum height ratio is outside `[0, 1]`
    #[error("Minimum height ratio {value} of phase '{phase}' is outside [0, 1]")]
    MinHeightRatioOutOfRange {
        /// Phase name
        phase: String,
        /// The offending ratio
        value: f64,
    },

    /// Two phases would produce the same trait column
    #[error("Phase '{phase}' produces trait column '{column}', which an earlier phase already produces")]
    ColumnCollision {
        /// The later of the two phases
        phase: String,
        /// The shared column name, without prefix
        column: String,
    },
}

/// Whether a phase reports a basal mean or integrated peaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    /// Mean secretion over the baseline window
    Baseline,
    /// Peak detection and integration over the peak window
    Peak,
}

impl PhaseKind {
    /// Parse `Baseline` / `Peak`, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "baseline" => Some(PhaseKind::Baseline),
            "peak" => Some(PhaseKind::Peak),
            _ => None,
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::Baseline => write!(f, "Baseline"),
            PhaseKind::Peak => write!(f, "Peak"),
        }
    }
}

/// One row of the phase-parameter table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    name: String,
    /// `Some` exactly for peak phases
    peak_range: Option<Interval>,
    baseline_range: RangeSpec,
    min_height_ratio: f64,
    min_peak_length: usize,
    negative_peak: bool,
    calculate_index: bool,
}

impl PhaseDefinition {
    /// A baseline phase reporting the mean over `baseline_range`
    ///
    /// # Errors
    ///
    /// Returns [`TraitError::Parse`] if `baseline_range` is malformed.
    pub fn baseline(name: impl Into<String>, baseline_range: &str) -> Result<Self, TraitError> {
        Ok(Self {
            name: name.into(),
            peak_range: None,
            baseline_range: RangeSpec::parse(baseline_range)?,
            min_height_ratio: DEFAULT_MIN_HEIGHT_RATIO,
            min_peak_length: DEFAULT_MIN_PEAK_LENGTH,
            negative_peak: false,
            calculate_index: false,
        })
    }

    /// A peak phase integrating peaks inside `peak_range` against `baseline_range`
    ///
    /// Starts from the default filters (10% relative height, 3 samples), a positive
    /// peak and no index.
    ///
    /// # Errors
    ///
    /// Returns [`TraitError::Parse`] if either range is malformed and
    /// [`ConfigError::PeakRangeNotInterval`] if `peak_range` is not one `a-b` token.
    pub fn peak(
        name: impl Into<String>,
        peak_range: &str,
        baseline_range: &str,
    ) -> Result<Self, TraitError> {
        let name = name.into();
        let spec = RangeSpec::parse(peak_range)?;
        let interval = spec
            .as_interval()
            .ok_or_else(|| ConfigError::PeakRangeNotInterval {
                phase: name.clone(),
                range: spec.to_string(),
            })?;
        Ok(Self {
            name,
            peak_range: Some(interval),
            baseline_range: RangeSpec::parse(baseline_range)?,
            min_height_ratio: DEFAULT_MIN_HEIGHT_RATIO,
            min_peak_length: DEFAULT_MIN_PEAK_LENGTH,
            negative_peak: false,
            calculate_index: false,
        })
    }

    /// Set the minimum peak height relative to the corrected curve maximum
    pub fn with_min_height_ratio(mut self, ratio: f64) -> Self {
        self.min_height_ratio = ratio;
        self
    }

    /// Set the minimum number of consecutive samples forming a peak
    pub fn with_min_peak_length(mut self, length: usize) -> Self {
        self.min_peak_length = length;
        self
    }

    /// Treat the phase as an inhibition (dip below baseline)
    pub fn with_negative_peak(mut self, negative: bool) -> Self {
        self.negative_peak = negative;
        self
    }

    /// Also report the stimulation (or inhibition) index
    pub fn with_index(mut self, calculate: bool) -> Self {
        self.calculate_index = calculate;
        self
    }

    /// Phase name, as used in trait column names
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Phase kind
    pub fn kind(&self) -> PhaseKind {
        match self.peak_range {
            Some(_) => PhaseKind::Peak,
            None => PhaseKind::Baseline,
        }
    }

    /// Peak window; always `Some` for peak phases
    pub fn peak_range(&self) -> Option<Interval> {
        self.peak_range
    }

    /// Baseline window
    pub fn baseline_range(&self) -> &RangeSpec {
        &self.baseline_range
    }

    /// Minimum relative peak height
    pub fn min_height_ratio(&self) -> f64 {
        self.min_height_ratio
    }

    /// Minimum peak length in samples
    pub fn min_peak_length(&self) -> usize {
        self.min_peak_length
    }

    /// Whether the phase is an inhibition
    pub fn is_negative_peak(&self) -> bool {
        self.negative_peak
    }

    /// Whether SI/II is reported
    pub fn calculate_index(&self) -> bool {
        self.calculate_index
    }

    /// Names of the trait columns this phase produces, without the prefix
    ///
    /// `{name}` for a baseline phase; `{name} AUC` for a peak phase, followed by
    /// `{name} SI` (or `{name} II` for an inhibition) when the index is enabled.
    pub fn trait_columns(&self) -> Vec<String> {
        match self.kind() {
            PhaseKind::Baseline => vec![self.name.clone()],
            PhaseKind::Peak => {
                let mut columns = vec![format!("{} AUC", self.name)];
                if self.calculate_index {
                    let suffix = if self.negative_peak { "II" } else { "SI" };
                    columns.push(format!("{} {}", self.name, suffix));
                }
                columns
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.kind() == PhaseKind::Peak && !(0.0..=1.0).contains(&self.min_height_ratio) {
            return Err(ConfigError::MinHeightRatioOutOfRange {
                phase: self.name.clone(),
                value: self.min_height_ratio,
            });
        }
        Ok(())
    }
}

/// An ordered, validated list of phase definitions
///
/// Row order determines the order of trait columns in the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTable {
    phases: Vec<PhaseDefinition>,
}

impl PhaseTable {
    /// Validate a list of phase definitions
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a peak phase has an out-of-range height ratio
    /// or two phases would produce the same trait column.
    pub fn new(phases: Vec<PhaseDefinition>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for phase in &phases {
            phase.validate()?;
            for column in phase.trait_columns() {
                if !seen.insert(column.clone()) {
                    return Err(ConfigError::ColumnCollision {
                        phase: phase.name.clone(),
                        column,
                    });
                }
            }
        }
        Ok(Self { phases })
    }

    /// Phases in table order
    pub fn phases(&self) -> &[PhaseDefinition] {
        &self.phases
    }

    /// Look up a phase by name
    pub fn get(&self, name: &str) -> Option<&PhaseDefinition> {
        self.phases.iter().find(|p| p.name == name)
    }

    /// Iterate over phases in table order
    pub fn iter(&self) -> std::slice::Iter<'_, PhaseDefinition> {
        self.phases.iter()
    }

    /// Number of phases
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Whether the table has no phases
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

impl<'a> IntoIterator for &'a PhaseTable {
    type Item = &'a PhaseDefinition;
    type IntoIter = std::slice::Iter<'a, PhaseDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}
