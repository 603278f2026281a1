//! Hormone secretion traits from perifusion curves
//!
//! Each phase of a [`PhaseTable`](crate::phase::PhaseTable) turns a donor's curve
//! into one or two numbers:
//!
//! | Trait | Phase kind | Computation |
//! |-------|------------|-------------|
//! | Basal secretion | Baseline | mean over the baseline window ([`mean_at`]) |
//! | AUC | Peak | baseline-corrected window ([`extract_region`]) integrated over qualifying peaks ([`integrate_peaks`]) |
//! | SI | Peak, positive | [`stimulation_index`] |
//! | II | Peak, negative | [`inhibition_index`] |
//!
//! # Usage
//!
//! ```rust
//! use perifusion::prelude::*;
//!
//! let data = PerifusionData::from_columns(vec![
//!     ("Time (min)", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]),
//!     ("D1", vec![2.0, 2.0, 2.0, 5.0, 2.0, 2.0, 2.0]),
//!     ("D2", vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
//! ])?;
//! let phases = PhaseTable::new(vec![
//!     PhaseDefinition::baseline("Basal", "1-2")?,
//!     PhaseDefinition::peak("KCl", "3-5", "1-2")?
//!         .with_min_peak_length(1)
//!         .with_index(true),
//! ])?;
//!
//! let table = data.traits(&phases, &TraitOptions::new("INS-IEQ"))?;
//! assert_eq!(table.get("D1", "INS-IEQ KCl SI"), Some(2.5));
//! assert_eq!(table.get("D2", "INS-IEQ KCl AUC"), Some(0.0));
//! # Ok::<(), perifusion::TraitError>(())
//! ```

mod baseline;
mod index;
mod orchestrate;
mod peaks;
mod region;
pub mod table;
pub mod types;


pub use baseline::mean_at;
pub use index::{inhibition_index, stimulation_index};
pub use orchestrate::{analyze_phase, compute_traits, compute_traits_from_csv, PerifusionTraits};
pub use peaks::integrate_peaks;
pub use region::extract_region;
pub use table::{TraitTable, TraitTableBuilder, DONOR_ID_COLUMN};
pub use types::{
    CorrectedRegion, IndexHeight, Peak, PhaseAnalysis, PhaseSummary, TraitOptions,
    DEFAULT_PREFIX, FLOAT_TOLERANCE,
};
