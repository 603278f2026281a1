//! Trait tables for whole donor populations

use approx::assert_relative_eq;
use perifusion::prelude::*;
use perifusion::TraitError;

/// A glucose ramp followed by an epinephrine dip, sampled every minute
fn axis() -> Vec<f64> {
    (1..=14).map(f64::from).collect()
}

fn curve(basal: f64, stim: f64, dip: f64) -> Vec<f64> {
    vec![
        basal,
        basal,
        basal,
        basal,
        basal + stim / 2.0,
        basal + stim,
        basal + stim / 2.0,
        basal,
        basal,
        basal - dip / 2.0,
        basal - dip,
        basal - dip / 2.0,
        basal,
        basal,
    ]
}

fn phases() -> PhaseTable {
    PhaseTable::new(vec![
        PhaseDefinition::baseline("Basal Secretion", "1-4").unwrap(),
        PhaseDefinition::peak("G 16.7", "4-8", "1-4")
            .unwrap()
            .with_min_height_ratio(0.1)
            .with_min_peak_length(3)
            .with_index(true),
        PhaseDefinition::peak("Epinephrine", "9-13", "1-4|14")
            .unwrap()
            .with_negative_peak(true)
            .with_index(true),
    ])
    .unwrap()
}

#[test]
fn test_stimulation_and_inhibition_indices() {
    let data = PerifusionData::builder(axis())
        .donor("R301", curve(2.0, 3.0, 1.0))
        .build()
        .unwrap();
    let table = data.traits(&phases(), &TraitOptions::new("INS-IEQ")).unwrap();

    assert_relative_eq!(table.get("R301", "INS-IEQ Basal Secretion").unwrap(), 2.0);
    assert_relative_eq!(table.get("R301", "INS-IEQ G 16.7 SI").unwrap(), 2.5);
    assert_relative_eq!(table.get("R301", "INS-IEQ Epinephrine II").unwrap(), 2.0);
    // Triangle of height 3 over four minutes
    assert_relative_eq!(table.get("R301", "INS-IEQ G 16.7 AUC").unwrap(), 6.0, epsilon = 1e-12);
    assert_relative_eq!(table.get("R301", "INS-IEQ Epinephrine AUC").unwrap(), 2.0, epsilon = 1e-12);
}

#[test]
fn test_missing_donor_does_not_affect_others() {
    let mut gappy: Vec<Option<f64>> = curve(2.0, 3.0, 1.0).into_iter().map(Some).collect();
    gappy[10] = None;

    let data = PerifusionData::builder(axis())
        .donor("R301", curve(2.0, 3.0, 1.0))
        .donor_with_missing("R302", gappy)
        .donor("R303", curve(1.0, 1.0, 0.5))
        .build()
        .unwrap();
    let table = compute_traits(&data, &phases(), &TraitOptions::default()).unwrap();

    assert_eq!(table.len(), 3);
    for column in table.columns() {
        assert!(table.get("R302", column).is_none(), "{column} should be missing");
        assert!(table.get("R301", column).is_some());
        assert!(table.get("R303", column).is_some());
    }
}

#[test]
fn test_non_responder() {
    let data = PerifusionData::builder(axis())
        .donor("flat", vec![1.5; 14])
        .build()
        .unwrap();
    let table = compute_traits(&data, &phases(), &TraitOptions::default()).unwrap();

    assert_eq!(table.get("flat", "GCG-IEQ G 16.7 AUC"), Some(0.0));
    assert_eq!(table.get("flat", "GCG-IEQ G 16.7 SI"), Some(1.0));
    assert_eq!(table.get("flat", "GCG-IEQ Epinephrine II"), Some(1.0));
}

#[test]
fn test_peak_details() {
    let data = PerifusionData::builder(axis())
        .donor("R301", curve(2.0, 3.0, 1.0))
        .build()
        .unwrap();
    let phases = phases();
    let stim = phases.get("G 16.7").unwrap();

    let analysis = data
        .analyze_phase("R301", stim, &TraitOptions::default())
        .unwrap();
    let peaks = analysis.peaks();
    assert_eq!(peaks.len(), 1);
    assert_relative_eq!(peaks[0].start_time, 4.0, epsilon = 1e-12);
    assert_relative_eq!(peaks[0].end_time, 8.0, epsilon = 1e-12);
    assert_relative_eq!(peaks[0].peak_time, 6.0);
    assert_relative_eq!(peaks[0].peak_height, 3.0);
    assert_relative_eq!(peaks[0].baseline, 2.0);
}

#[test]
fn test_concat_merges_hormones() {
    let ins = PerifusionData::builder(axis())
        .donor("R301", curve(2.0, 3.0, 1.0))
        .donor("R302", curve(1.0, 1.0, 0.5))
        .build()
        .unwrap();
    let gcg = PerifusionData::builder(axis())
        .donor("R302", curve(0.5, 0.2, 0.1))
        .donor("R304", curve(0.4, 0.2, 0.1))
        .build()
        .unwrap();

    let ins_table = ins.traits(&phases(), &TraitOptions::new("INS-IEQ")).unwrap();
    let gcg_table = gcg.traits(&phases(), &TraitOptions::new("GCG-IEQ")).unwrap();
    let merged = TraitTable::concat(&[ins_table, gcg_table]).unwrap();

    assert_eq!(merged.donors(), &["R301", "R302", "R304"]);
    assert_eq!(merged.columns().len(), 10);
    assert!(merged.get("R301", "GCG-IEQ Basal Secretion").is_none());
    assert!(merged.get("R304", "INS-IEQ Basal Secretion").is_none());
    assert_relative_eq!(merged.get("R302", "GCG-IEQ Basal Secretion").unwrap(), 0.5);
}

#[test]
fn test_same_prefix_cannot_be_concatenated() {
    let data = PerifusionData::builder(axis())
        .donor("R301", curve(2.0, 3.0, 1.0))
        .build()
        .unwrap();
    let table = data.traits(&phases(), &TraitOptions::default()).unwrap();
    assert!(TraitTable::concat(&[table.clone(), table]).is_err());
}

#[test]
fn test_point_peak_range_is_rejected() {
    let err = PhaseDefinition::peak("G 16.7", "4-6|8", "1-4").unwrap_err();
    assert!(matches!(err, TraitError::Config(_)));
}
