//! Trait extraction over a whole perifusion table
//!
//! [`compute_traits`] runs every phase of a [`PhaseTable`] against every donor and
//! assembles a [`TraitTable`]. Donors are independent, so each phase maps over the
//! donors (on the rayon pool when [`TraitOptions::parallel`] is set) and the results
//! are collected in donor order; the output does not depend on the thread count.

use rayon::prelude::*;
use std::path::Path;

use super::index::{inhibition_index, stimulation_index};
use super::peaks::integrate_peaks;
use super::region::extract_region;
use super::table::TraitTable;
use super::types::{IndexHeight, PhaseAnalysis, TraitOptions};
use crate::analysis::baseline::mean_at;
use crate::data::parser::read_perifusion;
use crate::data::series::PerifusionData;
use crate::error::TraitError;
use crate::phase::{PhaseDefinition, PhaseTable};

/// Compute the trait table of every donor in `data`
///
/// Columns follow the phase order of `phases`:
///
/// | Phase kind | Columns |
/// |------------|---------|
/// | Baseline   | `{prefix} {name}` |
/// | Peak       | `{prefix} {name} AUC`, plus `{prefix} {name} SI` or `... II` when the index is enabled |
///
/// A donor with any missing sample gets `None` in every column. A trait that is
/// undefined for a complete donor (empty baseline window, degenerate index) is
/// `None` as well.
///
/// # Errors
///
/// Donor data never causes an error. Column names cannot collide because
/// [`PhaseTable::new`] rejects such tables.
///
/// # Example
///
/// ```rust
/// use perifusion::prelude::*;
///
/// let data = PerifusionData::builder(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])
///     .donor("D1", vec![1.0, 1.0, 2.0, 3.0, 2.0, 1.0, 1.0])
///     .build()?;
///
/// let phases = PhaseTable::new(vec![
///     PhaseDefinition::baseline("Basal", "1-2")?,
///     PhaseDefinition::peak("Stim", "2-6", "1-2")?.with_index(true),
/// ])?;
///
/// let table = compute_traits(&data, &phases, &TraitOptions::new("INS-IEQ"))?;
/// assert_eq!(table.get("D1", "INS-IEQ Basal"), Some(1.0));
/// assert_eq!(table.get("D1", "INS-IEQ Stim AUC"), Some(4.0));
/// assert_eq!(table.get("D1", "INS-IEQ Stim SI"), Some(3.0));
/// # Ok::<(), perifusion::TraitError>(())
/// ```
pub fn compute_traits(
    data: &PerifusionData,
    phases: &PhaseTable,
    options: &TraitOptions,
) -> Result<TraitTable, TraitError> {
    let times = data.times();
    let donors: Vec<Option<Vec<f64>>> = data
        .donors()
        .iter()
        .map(|donor| {
            let values = donor.complete_values();
            if values.is_none() {
                tracing::warn!(donor = donor.id(), "missing samples, all traits set to missing");
            }
            values
        })
        .collect();

    let ids = data.donor_ids().into_iter().map(String::from).collect();
    let mut builder = TraitTable::builder(ids);

    for phase in phases {
        tracing::debug!(
            phase = phase.name(),
            kind = %phase.kind(),
            donors = donors.len(),
            "computing phase"
        );
        if phase.baseline_range().resolve(times).is_empty() {
            tracing::warn!(
                phase = phase.name(),
                range = %phase.baseline_range(),
                "baseline window matches no time point"
            );
        }

        let results = map_donors(&donors, options.parallel, |values| {
            analyze(times, values, phase, options.index_height)
        });

        // One value column per entry of `phase.trait_columns()`, in the same order
        let columns: Vec<Vec<Option<f64>>> = match phase.peak_range() {
            None => {
                let means = results
                    .into_iter()
                    .map(|r| match r {
                        Some(PhaseAnalysis::Baseline { mean }) => mean,
                        _ => None,
                    })
                    .collect();
                vec![means]
            }
            Some(_) => {
                let (areas, indices): (Vec<Option<f64>>, Vec<Option<f64>>) = results
                    .into_iter()
                    .map(|r| match r {
                        Some(PhaseAnalysis::Peak { summary, index, .. }) => {
                            (Some(summary.total_area), index)
                        }
                        _ => (None, None),
                    })
                    .unzip();
                if phase.calculate_index() {
                    vec![areas, indices]
                } else {
                    vec![areas]
                }
            }
        };

        for (name, values) in phase.trait_columns().into_iter().zip(columns) {
            builder.push_column(format!("{} {}", options.prefix, name), values)?;
        }
    }

    Ok(builder.build())
}

/// Analyze a single donor and phase in detail
///
/// Returns `None` if the donor is unknown or has missing samples.
pub fn analyze_phase(
    data: &PerifusionData,
    donor: &str,
    phase: &PhaseDefinition,
    options: &TraitOptions,
) -> Option<PhaseAnalysis> {
    let values = data.donor(donor)?.complete_values()?;
    Some(analyze(data.times(), &values, phase, options.index_height))
}

/// Load both tables from CSV files and compute the traits
///
/// The input table is read first, then the phase table; any error in either
/// aborts before a donor is processed.
pub fn compute_traits_from_csv(
    input: impl AsRef<Path>,
    phases: impl AsRef<Path>,
    options: &TraitOptions,
) -> Result<TraitTable, TraitError> {
    let data = read_perifusion(input)?;
    let phases = PhaseTable::from_path(phases)?;
    compute_traits(&data, &phases, options)
}

/// Extension trait running trait extraction directly on a [`PerifusionData`]
///
/// ```rust
/// use perifusion::prelude::*;
///
/// let data = PerifusionData::builder(vec![1.0, 2.0, 3.0])
///     .donor("D1", vec![2.0, 4.0, 6.0])
///     .build()?;
/// let phases = PhaseTable::new(vec![PhaseDefinition::baseline("Basal", "1-3")?])?;
///
/// let table = data.traits(&phases, &TraitOptions::default())?;
/// assert_eq!(table.get("D1", "GCG-IEQ Basal"), Some(4.0));
/// # Ok::<(), perifusion::TraitError>(())
/// ```
pub trait PerifusionTraits {
    /// See [`compute_traits`]
    fn traits(&self, phases: &PhaseTable, options: &TraitOptions)
        -> Result<TraitTable, TraitError>;

    /// See [`analyze_phase`]
    fn analyze_phase(
        &self,
        donor: &str,
        phase: &PhaseDefinition,
        options: &TraitOptions,
    ) -> Option<PhaseAnalysis>;
}

impl PerifusionTraits for PerifusionData {
    fn traits(
        &self,
        phases: &PhaseTable,
        options: &TraitOptions,
    ) -> Result<TraitTable, TraitError> {
        compute_traits(self, phases, options)
    }

    fn analyze_phase(
        &self,
        donor: &str,
        phase: &PhaseDefinition,
        options: &TraitOptions,
    ) -> Option<PhaseAnalysis> {
        analyze_phase(self, donor, phase, options)
    }
}

/// Apply `f` to every complete donor, preserving donor order
fn map_donors<T, F>(donors: &[Option<Vec<f64>>], parallel: bool, f: F) -> Vec<Option<T>>
where
    T: Send,
    F: Fn(&[f64]) -> T + Sync,
{
    if parallel {
        donors
            .par_iter()
            .map(|values| values.as_deref().map(&f))
            .collect()
    } else {
        donors
            .iter()
            .map(|values| values.as_deref().map(&f))
            .collect()
    }
}

/// One donor, one phase
fn analyze(
    times: &[f64],
    values: &[f64],
    phase: &PhaseDefinition,
    index_height: IndexHeight,
) -> PhaseAnalysis {
    let Some(peak_range) = phase.peak_range() else {
        let mean = mean_at(times, values, phase.baseline_range());
        return PhaseAnalysis::Baseline {
            mean: Some(mean).filter(|m| !m.is_nan()),
        };
    };

    let region = extract_region(
        times,
        values,
        peak_range,
        phase.baseline_range(),
        phase.is_negative_peak(),
    );
    let (summary, peaks) = integrate_peaks(
        &region.times,
        &region.values,
        region.baseline,
        phase.min_height_ratio(),
        phase.min_peak_length(),
    );

    let index = if phase.calculate_index() {
        let height = match index_height {
            IndexHeight::CurveMax => region.clamped_max(),
            IndexHeight::PeakMax => summary.max_height,
        };
        if phase.is_negative_peak() {
            inhibition_index(region.baseline, height)
        } else {
            stimulation_index(region.baseline, height)
        }
    } else {
        None
    };

    PhaseAnalysis::Peak {
        region,
        summary,
        peaks,
        index,
    }
}
