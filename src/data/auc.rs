//! Trapezoidal integration primitives
//!
//! Standalone functions on raw `&[f64]` slices used by the peak integrator. They
//! hold no knowledge of phases, donors or baselines: callers pass an already
//! baseline-corrected curve.
//!
//! # Example
//!
//! ```rust
//! use perifusion::data::auc::{trapezoid_span, zero_crossing_after, zero_crossing_before};
//!
//! let times = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let values = [-1.0, 1.0, 2.0, 1.0, -1.0];
//!
//! // Area between samples 1 and 3
//! assert_eq!(trapezoid_span(&times, &values, 1, 3), 3.0);
//!
//! // The curve crosses zero half way between samples 0/1 and 3/4
//! assert_eq!(zero_crossing_before(&times, &values, 1, 1e-5), Some(1.5));
//! assert_eq!(zero_crossing_after(&times, &values, 3, 1e-5), Some(4.5));
//! ```

/// Linear trapezoid area of a single segment
#[inline]
pub fn trapezoid(t1: f64, v1: f64, t2: f64, v2: f64) -> f64 {
    (t2 - t1) * (v1 + v2) / 2.0
}

/// Trapezoidal area over every consecutive sample pair in `[start, end]`
///
/// Returns 0.0 for a single-sample span (`start == end`).
///
/// # Panics
///
/// Panics if `end` is out of bounds for either slice.
pub fn trapezoid_span(times: &[f64], values: &[f64], start: usize, end: usize) -> f64 {
    (start..end)
        .map(|i| trapezoid(times[i], values[i], times[i + 1], values[i + 1]))
        .sum()
}

/// Interpolated time at which the curve rises through zero before sample `idx`
///
/// Uses the segment `(idx - 1, idx)`. Returns `None` when `idx` is the first
/// sample or when the segment is too flat (`|dy| <= tolerance`) to interpolate.
pub fn zero_crossing_before(times: &[f64], values: &[f64], idx: usize, tolerance: f64) -> Option<f64> {
    if idx == 0 {
        return None;
    }
    let dx = times[idx] - times[idx - 1];
    let dy = values[idx] - values[idx - 1];
    if dy.abs() > tolerance {
        Some(times[idx] - dx * values[idx] / dy)
    } else {
        None
    }
}

/// Interpolated time at which the curve falls through zero after sample `idx`
///
/// Uses the segment `(idx, idx + 1)`. Returns `None` when `idx` is the last
/// sample or when the segment is too flat (`|dy| <= tolerance`) to interpolate.
pub fn zero_crossing_after(times: &[f64], values: &[f64], idx: usize, tolerance: f64) -> Option<f64> {
    if idx + 1 >= times.len() {
        return None;
    }
    let dx = times[idx + 1] - times[idx];
    let dy = values[idx + 1] - values[idx];
    if dy.abs() > tolerance {
        Some(times[idx] + dx * values[idx] / dy.abs())
    } else {
        None
    }
}
