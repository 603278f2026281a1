//! Peak detection and integration on corrected curves

use approx::assert_relative_eq;
use perifusion::analysis::{extract_region, integrate_peaks, FLOAT_TOLERANCE};
use perifusion::data::range::{Interval, RangeSpec};

const X: [f64; 7] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];

#[test]
fn test_single_triangle() {
    let y = [0.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0];
    let (summary, peaks) = integrate_peaks(&X, &y, 0.0, 0.1, 3);

    assert_eq!(summary.peak_count, 1);
    assert_eq!(peaks.len(), 1);
    assert_relative_eq!(summary.total_area, 4.0, epsilon = 1e-12);
    assert_relative_eq!(summary.max_height, 2.0);
    assert_relative_eq!(peaks[0].peak_time, 4.0);
}

#[test]
fn test_integration_is_deterministic() {
    let y = [0.1, 0.7, 1.3, 0.2, 0.0, 0.9, 0.4];
    let first = integrate_peaks(&X, &y, 1.0, 0.1, 2);
    let second = integrate_peaks(&X, &y, 1.0, 0.1, 2);
    assert_eq!(first, second);
}

#[test]
fn test_flat_curve_has_no_peaks() {
    let y = [FLOAT_TOLERANCE; 7];
    let (summary, peaks) = integrate_peaks(&X, &y, 0.0, 0.1, 1);
    assert_eq!(summary.peak_count, 0);
    assert_eq!(summary.total_area, 0.0);
    assert_eq!(summary.max_height, 0.0);
    assert!(peaks.is_empty());
}

#[test]
fn test_shortened_run_is_removed() {
    let long = [0.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0];
    let short = [0.0, 0.0, 0.0, 2.0, 1.0, 0.0, 0.0];

    let (summary, _) = integrate_peaks(&X, &long, 0.0, 0.0, 3);
    assert_eq!(summary.peak_count, 1);

    let (summary, peaks) = integrate_peaks(&X, &short, 0.0, 0.0, 3);
    assert_eq!(summary.peak_count, 0);
    assert_eq!(summary.total_area, 0.0);
    assert!(peaks.is_empty());
}

#[test]
fn test_raising_height_ratio_removes_only_the_small_run() {
    let x: Vec<f64> = (1..=11).map(f64::from).collect();
    let y = [0.0, 1.0, 4.0, 1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0, 0.0];

    let (both, peaks) = integrate_peaks(&x, &y, 0.0, 0.4, 3);
    assert_eq!(both.peak_count, 2);
    let big_area = peaks[0].auc;

    // 2 / 4 = 0.5 is the small run's relative height
    let (one, peaks) = integrate_peaks(&x, &y, 0.0, 0.6, 3);
    assert_eq!(one.peak_count, 1);
    assert_relative_eq!(peaks[0].peak_time, 3.0);
    assert_relative_eq!(one.total_area, big_area);
}

#[test]
fn test_peaks_are_in_time_order() {
    let x: Vec<f64> = (0..12).map(f64::from).collect();
    let y = [0.0, 2.0, 3.0, 2.0, 0.0, 1.0, 2.0, 1.0, 0.0, 5.0, 6.0, 5.0];
    let (summary, peaks) = integrate_peaks(&x, &y, 0.0, 0.0, 3);

    assert_eq!(summary.peak_count, 3);
    let times: Vec<f64> = peaks.iter().map(|p| p.peak_time).collect();
    assert_eq!(times, vec![2.0, 6.0, 10.0]);
    // The last run touches the end of the window
    assert_eq!(peaks[2].end_time, 11.0);
    assert_relative_eq!(summary.max_height, 6.0);
    assert_relative_eq!(
        summary.total_area,
        peaks.iter().map(|p| p.auc).sum::<f64>(),
        epsilon = 1e-12
    );
}

#[test]
fn test_uneven_spacing_interpolates_crossings() {
    let x = [0.0, 2.0, 3.0, 7.0];
    let y = [-2.0, 2.0, 2.0, -2.0];
    let (summary, peaks) = integrate_peaks(&x, &y, 0.0, 0.0, 2);

    assert_relative_eq!(peaks[0].start_time, 1.0, epsilon = 1e-12);
    assert_relative_eq!(peaks[0].end_time, 5.0, epsilon = 1e-12);
    // 2 inside, 1 on the left, 2 on the right
    assert_relative_eq!(summary.total_area, 5.0, epsilon = 1e-12);
}

#[test]
fn test_inhibition_dip_becomes_positive_peak() {
    let times = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    let values = [4.0, 4.0, 4.0, 3.0, 2.0, 3.0, 4.0, 4.0];
    let region = extract_region(
        &times,
        &values,
        Interval::new(3, 7),
        &RangeSpec::parse("1-2|8").unwrap(),
        true,
    );
    assert_eq!(region.baseline, 4.0);
    assert_eq!(region.values, vec![0.0, 1.0, 2.0, 1.0, 0.0]);

    let (summary, _) = integrate_peaks(&region.times, &region.values, region.baseline, 0.1, 3);
    assert_eq!(summary.peak_count, 1);
    assert_relative_eq!(summary.total_area, 4.0, epsilon = 1e-12);
    assert_eq!(summary.baseline, 4.0);
}
