//! Hormone secretion traits from islet perifusion experiments
//!
//! A perifusion run measures secretion over time for a set of donors. Given a table
//! of phases (baseline windows, stimulation or inhibition windows) this crate
//! extracts per-donor traits: basal secretion, baseline-corrected area under the
//! curve of the qualifying peaks, and stimulation or inhibition indices.
//!
//! ```rust
//! use perifusion::prelude::*;
//!
//! let data = PerifusionData::builder(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])
//!     .donor("R301", vec![0.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0])
//!     .build()?;
//! let phases = PhaseTable::new(vec![PhaseDefinition::peak("G 16.7", "1-7", "1-2")?])?;
//!
//! let traits = data.traits(&phases, &TraitOptions::default())?;
//! assert_eq!(traits.get("R301", "GCG-IEQ G 16.7 AUC"), Some(4.0));
//! # Ok::<(), perifusion::TraitError>(())
//! ```

pub mod analysis;
pub mod data;
pub mod error;
pub mod phase;

pub use analysis::{compute_traits, compute_traits_from_csv, PerifusionTraits, TraitTable};
pub use error::TraitError;

pub mod prelude {
    pub use crate::analysis::{
        analyze_phase, compute_traits, compute_traits_from_csv, IndexHeight, Peak,
        PerifusionTraits, PhaseAnalysis, PhaseSummary, TraitOptions, TraitTable,
    };
    pub use crate::data::parser::read_perifusion;
    pub use crate::data::{PerifusionData, RangeSpec};
    pub use crate::error::TraitError;
    pub use crate::phase::{PhaseDefinition, PhaseKind, PhaseTable};
}
