//! Peak detection and integration on a baseline-corrected curve
//!
//! # Algorithm
//!
//! 1. A peak is a maximal run of consecutive samples whose corrected value exceeds
//!    [`FLOAT_TOLERANCE`]. Runs shorter than `min_peak_length` are dropped.
//! 2. A run is also dropped when its maximum is below `min_height_ratio` times the
//!    maximum of the whole curve.
//! 3. The area of a surviving run is the trapezoidal sum over its samples plus the
//!    triangles between each edge sample and the interpolated zero crossing
//!    outside it. A run touching the first or last sample of the window is not
//!    extended beyond the window.
//!
//! ```text
//!            ●
//!          ╱   ╲
//!   ──────●─────●──────   zero (baseline)
//!  ●    ↑ start   end ↑     ●
//! ```

use super::types::{Peak, PhaseSummary, FLOAT_TOLERANCE};
use crate::data::auc::{trapezoid_span, zero_crossing_after, zero_crossing_before};

/// An inclusive index span `[start, end]` of samples above tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    start: usize,
    end: usize,
}

impl Run {
    fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Maximal runs of values above [`FLOAT_TOLERANCE`] with at least `min_len` samples
fn find_runs(values: &[f64], min_len: usize) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;

    for (i, &v) in values.iter().enumerate() {
        match (v > FLOAT_TOLERANCE, open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                runs.push(Run { start, end: i - 1 });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        runs.push(Run {
            start,
            end: values.len() - 1,
        });
    }

    runs.retain(|run| run.len() >= min_len);
    runs
}

/// Maximum of a run and its index, first occurrence on ties
fn run_maximum(values: &[f64], run: Run) -> (usize, f64) {
    let mut loc = run.start;
    let mut height = values[run.start];
    for i in run.start + 1..=run.end {
        if values[i] > height {
            height = values[i];
            loc = i;
        }
    }
    (loc, height)
}

/// Detect, filter and integrate the peaks of a corrected curve
///
/// # Arguments
///
/// * `times` - Sampled times of the window (ascending)
/// * `values` - Baseline-corrected values, parallel to `times`
/// * `baseline` - Baseline the curve was corrected against, passed through
/// * `min_height_ratio` - Minimum peak height relative to the curve maximum
/// * `min_peak_length` - Minimum number of consecutive samples in a peak
///
/// # Returns
///
/// The phase summary and the qualifying peaks in ascending time order.
///
/// # Panics
///
/// Panics if `times` and `values` have different lengths.
///
/// # Example
///
/// ```rust
/// use perifusion::analysis::integrate_peaks;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
/// let y = [0.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0];
///
/// let (summary, peaks) = integrate_peaks(&x, &y, 0.0, 0.1, 3);
/// assert_eq!(summary.peak_count, 1);
/// assert!((summary.total_area - 4.0).abs() < 1e-12);
/// assert_eq!(peaks[0].peak_time, 4.0);
/// ```
pub fn integrate_peaks(
    times: &[f64],
    values: &[f64],
    baseline: f64,
    min_height_ratio: f64,
    min_peak_length: usize,
) -> (PhaseSummary, Vec<Peak>) {
    assert_eq!(
        times.len(),
        values.len(),
        "times and values must have the same length"
    );

    let curve_max = if values.is_empty() {
        0.0
    } else {
        values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    };
    let threshold = min_height_ratio * curve_max;

    let peaks: Vec<Peak> = find_runs(values, min_peak_length)
        .into_iter()
        .filter_map(|run| {
            let (loc, height) = run_maximum(values, run);
            if height < threshold {
                return None;
            }
            Some(integrate_run(times, values, run, loc, height, baseline))
        })
        .collect();

    let summary = peaks.iter().fold(PhaseSummary::empty(baseline), |acc, peak| PhaseSummary {
        peak_count: acc.peak_count + 1,
        total_area: acc.total_area + peak.auc,
        baseline: acc.baseline,
        max_height: if peak.peak_height > acc.max_height {
            peak.peak_height
        } else {
            acc.max_height
        },
    });

    (summary, peaks)
}

/// Area and interpolated boundaries of one qualifying run
fn integrate_run(
    times: &[f64],
    values: &[f64],
    run: Run,
    loc: usize,
    height: f64,
    baseline: f64,
) -> Peak {
    let mut auc = trapezoid_span(times, values, run.start, run.end);

    let start_time = match zero_crossing_before(times, values, run.start, FLOAT_TOLERANCE) {
        Some(crossing) => {
            auc += (times[run.start] - crossing) * values[run.start] / 2.0;
            crossing
        }
        None => times[run.start],
    };

    let end_time = match zero_crossing_after(times, values, run.end, FLOAT_TOLERANCE) {
        Some(crossing) => {
            auc += (crossing - times[run.end]) * values[run.end] / 2.0;
            crossing
        }
        None => times[run.end],
    };

    tracing::trace!(start_time, end_time, peak_time = times[loc], height, auc, "peak");

    Peak {
        start_time,
        end_time,
        peak_time: times[loc],
        peak_height: height,
        auc,
        baseline,
    }
}
