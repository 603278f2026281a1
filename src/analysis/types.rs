//! Analysis types: options, detected peaks and per-phase results

use serde::{Deserialize, Serialize};

/// Tolerance below which a corrected value is treated as zero
///
/// Guards peak detection and boundary interpolation against floating-point noise.
pub const FLOAT_TOLERANCE: f64 = 1e-5;

/// Default trait column prefix
pub const DEFAULT_PREFIX: &str = "GCG-IEQ";

// ============================================================================
// Configuration
// ============================================================================

/// Which height feeds the stimulation / inhibition index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexHeight {
    /// Maximum of the whole corrected sub-curve, clamped at zero
    #[default]
    CurveMax,
    /// Maximum height among the peaks that passed the length and height filters
    PeakMax,
}

/// Trait extraction options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitOptions {
    /// Prefix of every trait column, e.g. `INS-IEQ` (default: `GCG-IEQ`)
    pub prefix: String,
    /// Process donors on the rayon thread pool (default: true)
    ///
    /// Output is identical either way; only wall-clock time changes.
    pub parallel: bool,
    /// Height used for SI/II (default: [`IndexHeight::CurveMax`])
    pub index_height: IndexHeight,
}

impl Default for TraitOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            parallel: true,
            index_height: IndexHeight::CurveMax,
        }
    }
}

impl TraitOptions {
    /// Options with the given column prefix and default settings otherwise
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::default().with_prefix(prefix)
    }

    /// Set the trait column prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enable or disable parallel processing of donors
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the height used for SI/II
    pub fn with_index_height(mut self, index_height: IndexHeight) -> Self {
        self.index_height = index_height;
        self
    }
}

// ============================================================================
// Results
// ============================================================================

/// A detected peak in a baseline-corrected curve
///
/// `start_time` and `end_time` are interpolated zero crossings and need not
/// coincide with a sampled time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Interpolated start of the excursion
    pub start_time: f64,
    /// Interpolated end of the excursion
    pub end_time: f64,
    /// Sampled time of the maximum
    pub peak_time: f64,
    /// Maximum corrected value
    pub peak_height: f64,
    /// Area under the corrected curve, including interpolated edges
    pub auc: f64,
    /// Baseline the curve was corrected against
    pub baseline: f64,
}

/// Aggregate of all qualifying peaks of one phase for one donor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSummary {
    /// Number of qualifying peaks
    pub peak_count: usize,
    /// Sum of the peak areas
    pub total_area: f64,
    /// Baseline the curve was corrected against
    pub baseline: f64,
    /// Largest peak height (0 if no peak qualifies)
    pub max_height: f64,
}

impl PhaseSummary {
    /// A summary with no peaks
    pub fn empty(baseline: f64) -> Self {
        Self {
            peak_count: 0,
            total_area: 0.0,
            baseline,
            max_height: 0.0,
        }
    }
}

/// A baseline-corrected window of one donor's curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectedRegion {
    /// Sampled times inside the peak window
    pub times: Vec<f64>,
    /// Corrected values; positive means away from baseline in the phase direction
    pub values: Vec<f64>,
    /// Mean over the baseline window (NaN if the window matched no sample)
    pub baseline: f64,
}

impl CorrectedRegion {
    /// Maximum corrected value clamped at zero (0 for an empty region)
    pub fn clamped_max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Detailed result of one phase for one donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhaseAnalysis {
    /// Basal mean; `None` if the baseline window matched no sample
    Baseline {
        /// Mean secretion over the window
        mean: Option<f64>,
    },
    /// Integrated peaks of a stimulus window
    Peak {
        /// The corrected window the peaks were detected in
        region: CorrectedRegion,
        /// Aggregate over qualifying peaks
        summary: PhaseSummary,
        /// Qualifying peaks in ascending time order
        peaks: Vec<Peak>,
        /// SI or II, if requested and defined
        index: Option<f64>,
    },
}

impl PhaseAnalysis {
    /// Total peak area for a peak phase
    pub fn total_area(&self) -> Option<f64> {
        match self {
            PhaseAnalysis::Baseline { .. } => None,
            PhaseAnalysis::Peak { summary, .. } => Some(summary.total_area),
        }
    }

    /// Detected peaks (empty for a baseline phase)
    pub fn peaks(&self) -> &[Peak] {
        match self {
            PhaseAnalysis::Baseline { .. } => &[],
            PhaseAnalysis::Peak { peaks, .. } => peaks,
        }
    }
}
