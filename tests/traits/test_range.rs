//! Range specifications resolved against irregular time axes

use perifusion::data::range::{RangeError, RangeSpec};
use perifusion::analysis::mean_at;
use approx::assert_relative_eq;

/// Sampling every 3 minutes with a denser stretch, as in a typical perifusion run
fn axis() -> Vec<f64> {
    vec![3.0, 6.0, 9.0, 12.0, 13.0, 14.0, 15.0, 18.0, 21.0]
}

#[test]
fn test_interval_returns_points_inside() {
    let spec = RangeSpec::parse("6-14").unwrap();
    assert_eq!(spec.resolve(&axis()), vec![6.0, 9.0, 12.0, 13.0, 14.0]);
}

#[test]
fn test_point_present_and_absent() {
    assert_eq!(RangeSpec::parse("15").unwrap().resolve(&axis()), vec![15.0]);
    assert!(RangeSpec::parse("16").unwrap().resolve(&axis()).is_empty());
}

#[test]
fn test_union_of_interval_and_point() {
    let spec = RangeSpec::parse("3-6|21").unwrap();
    assert_eq!(spec.resolve(&axis()), vec![3.0, 6.0, 21.0]);
}

#[test]
fn test_overlapping_tokens_do_not_duplicate() {
    let spec = RangeSpec::parse("9-13|12|13-15").unwrap();
    assert_eq!(spec.resolve(&axis()), vec![9.0, 12.0, 13.0, 14.0, 15.0]);
}

#[test]
fn test_interval_outside_axis_is_empty() {
    assert!(RangeSpec::parse("100-200").unwrap().resolve(&axis()).is_empty());
}

#[test]
fn test_non_integer_token_fails() {
    assert!(matches!(
        RangeSpec::parse("3-6|7.5"),
        Err(RangeError::NonInteger { .. })
    ));
    assert!(matches!(
        RangeSpec::parse("a-b"),
        Err(RangeError::NonInteger { .. })
    ));
}

#[test]
fn test_mean_over_whole_axis() {
    let values = vec![1.0, 2.0, 4.0, 8.0, 16.0, 8.0, 4.0, 2.0, 1.0];
    let spec = RangeSpec::parse("0-100").unwrap();
    let expected = values.iter().sum::<f64>() / values.len() as f64;
    assert_relative_eq!(mean_at(&axis(), &values, &spec), expected, epsilon = 1e-12);
}

#[test]
fn test_mean_over_union() {
    let values = vec![1.0, 2.0, 4.0, 8.0, 16.0, 8.0, 4.0, 2.0, 1.0];
    let spec = RangeSpec::parse("3|18-21").unwrap();
    assert_relative_eq!(mean_at(&axis(), &values, &spec), 4.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn test_mean_over_empty_window_is_nan() {
    let values = vec![1.0; 9];
    let spec = RangeSpec::parse("1000").unwrap();
    assert!(mean_at(&axis(), &values, &spec).is_nan());
}
