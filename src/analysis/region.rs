//! Baseline-corrected extraction of a phase window

use super::baseline::mean_at;
use super::types::CorrectedRegion;
use crate::data::range::{Interval, RangeSpec};

/// Cut the peak window out of a curve and correct it against a baseline
///
/// The baseline is the mean over `baseline_range`. Samples whose time lies in
/// `peak_range` (inclusive) are kept in their original order and corrected as
/// `value - baseline`, or `baseline - value` for a negative (inhibition) peak so
/// that dips become positive excursions.
///
/// # Example
///
/// ```rust
/// use perifusion::analysis::extract_region;
/// use perifusion::data::range::{Interval, RangeSpec};
///
/// let times = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let values = [0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3, 1.4];
///
/// let region = extract_region(
///     &times,
///     &values,
///     Interval::new(5, 8),
///     &RangeSpec::parse("1-3").unwrap(),
///     false,
/// );
/// assert!((region.baseline - 0.6).abs() < 1e-12);
/// assert_eq!(region.times, vec![5.0, 6.0, 7.0, 8.0]);
/// ```
pub fn extract_region(
    times: &[f64],
    values: &[f64],
    peak_range: Interval,
    baseline_range: &RangeSpec,
    negative_peak: bool,
) -> CorrectedRegion {
    let baseline = mean_at(times, values, baseline_range);

    let (times, values): (Vec<f64>, Vec<f64>) = times
        .iter()
        .zip(values)
        .filter(|&(&t, _)| peak_range.contains(t))
        .map(|(&t, &v)| {
            let corrected = if negative_peak {
                baseline - v
            } else {
                v - baseline
            };
            (t, corrected)
        })
        .unzip();

    CorrectedRegion {
        times,
        values,
        baseline,
    }
}
