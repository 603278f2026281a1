//! Mean secretion over one or more time windows

use crate::data::range::RangeSpec;

/// Arithmetic mean of the values whose time is denoted by `spec`
///
/// Returns NaN when the specification matches no time point; callers turn that
/// into a missing trait rather than an error.
///
/// # Panics
///
/// Panics if `times` and `values` have different lengths.
///
/// # Example
///
/// ```rust
/// use perifusion::analysis::mean_at;
/// use perifusion::data::range::RangeSpec;
///
/// let times = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let values = [0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3, 1.4];
///
/// let basal = mean_at(&times, &values, &RangeSpec::parse("3-9").unwrap());
/// assert!((basal - 1.0).abs() < 1e-12);
/// ```
pub fn mean_at(times: &[f64], values: &[f64], spec: &RangeSpec) -> f64 {
    assert_eq!(
        times.len(),
        values.len(),
        "times and values must have the same length"
    );

    let (sum, n) = times
        .iter()
        .zip(values)
        .filter(|&(&t, _)| spec.contains(t))
        .fold((0.0, 0usize), |(sum, n), (_, &v)| (sum + v, n + 1));

    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}
