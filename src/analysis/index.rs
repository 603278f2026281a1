//! Stimulation and inhibition indices
//!
//! Both indices compare the extreme of the response with the baseline:
//!
//! ```text
//! SI = (baseline + height) / baseline            defined when baseline > 0
//! II = baseline / (baseline - height)            defined when baseline and the valley share a sign
//! ```
//!
//! An undefined index is `None`, never an infinity or an error.

/// Stimulation index of a positive response
///
/// # Example
///
/// ```rust
/// use perifusion::analysis::stimulation_index;
///
/// assert_eq!(stimulation_index(2.0, 3.0), Some(2.5));
/// assert_eq!(stimulation_index(0.0, 3.0), None);
/// ```
pub fn stimulation_index(baseline: f64, height: f64) -> Option<f64> {
    let peak_max = baseline + height;
    if baseline > 0.0 {
        Some(peak_max / baseline)
    } else {
        None
    }
}

/// Inhibition index of a negative response
///
/// `height` is the depth of the dip below baseline.
///
/// # Example
///
/// ```rust
/// use perifusion::analysis::inhibition_index;
///
/// assert_eq!(inhibition_index(2.0, 1.0), Some(2.0));
/// assert_eq!(inhibition_index(2.0, 2.0), None); // valley at zero
/// ```
pub fn inhibition_index(baseline: f64, height: f64) -> Option<f64> {
    let valley_min = baseline - height;
    if valley_min * baseline > 0.0 {
        Some(baseline / valley_min)
    } else {
        None
    }
}
