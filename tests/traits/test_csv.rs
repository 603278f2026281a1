//! Loading tables from CSV and writing results back

use perifusion::data::series::SchemaError;
use perifusion::phase::ConfigError;
use perifusion::prelude::*;
use perifusion::data::parser::load_perifusion_reader;
use std::path::PathBuf;

const PARAMETERS: &str = "\
PeakName,PeakRange,BaselineTime,MinHeightRatio,MinPeakLength,BaselineOrPeak,NegativePeak,CalculateSIorII
Basal Secretion,,1-4,,,Baseline,,
G 16.7,4-8,1-4,0.1,3,Peak,FALSE,TRUE
Epinephrine,8-12,1-4,0.1,3.0,peak,TRUE,TRUE
";

const PERIFUSION: &str = "\
Time (min),R301,R302
1,2.0,1.0
2,2.0,1.0
3,2.0,1.0
4,2.0,NA
5,3.0,1.0
6,5.0,1.0
7,3.0,1.0
8,2.0,1.0
9,1.5,1.0
10,1.0,1.0
11,1.5,1.0
12,2.0,1.0
";

/// Per-test scratch directory, removed on drop
struct Scratch(PathBuf);

impl Scratch {
    fn new(test: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("perifusion-{}-{test}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.0.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[test]
fn test_end_to_end_from_files() {
    let scratch = Scratch::new("end_to_end");
    let input = scratch.write("ins_ieq.csv", PERIFUSION);
    let params = scratch.write("ins_parameter.csv", PARAMETERS);

    let table = compute_traits_from_csv(&input, &params, &TraitOptions::new("INS-IEQ")).unwrap();
    assert_eq!(table.donors(), &["R301", "R302"]);
    assert_eq!(table.get("R301", "INS-IEQ Basal Secretion"), Some(2.0));
    assert_eq!(table.get("R301", "INS-IEQ G 16.7 AUC"), Some(5.0));
    assert_eq!(table.get("R301", "INS-IEQ G 16.7 SI"), Some(2.5));
    assert_eq!(table.get("R301", "INS-IEQ Epinephrine AUC"), Some(2.0));
    assert_eq!(table.get("R301", "INS-IEQ Epinephrine II"), Some(2.0));
    // "NA" marks a missing sample
    assert!(table.row("R302").unwrap().iter().all(|(_, v)| v.is_none()));

    let output = scratch.0.join("traits.csv");
    table.to_csv_path(&output).unwrap();
    let written = std::fs::read_to_string(&output).unwrap();
    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some("Donor ID,INS-IEQ Basal Secretion,INS-IEQ G 16.7 AUC,INS-IEQ G 16.7 SI,INS-IEQ Epinephrine AUC,INS-IEQ Epinephrine II")
    );
    assert_eq!(lines.next(), Some("R301,2,5,2.5,2,2"));
    assert_eq!(lines.next(), Some("R302,,,,,"));
}

#[test]
fn test_missing_parameter_column_fails_before_processing() {
    let params = PARAMETERS.replacen(",MinPeakLength", "", 1);
    let err = PhaseTable::from_reader(params.as_bytes()).unwrap_err();
    match err {
        TraitError::Config(ConfigError::MissingColumns { missing }) => {
            assert_eq!(missing, vec!["MinPeakLength".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let scratch = Scratch::new("bad_params");
    let input = scratch.write("ins_ieq.csv", PERIFUSION);
    let bad = scratch.write("bad_parameter.csv", &params);
    assert!(matches!(
        compute_traits_from_csv(&input, &bad, &TraitOptions::default()),
        Err(TraitError::Config(_))
    ));
}

#[test]
fn test_scratch_files_are_removed() {
    let dir = {
        let scratch = Scratch::new("cleanup");
        scratch.write("ins_ieq.csv", PERIFUSION);
        assert!(scratch.0.exists());
        scratch.0.clone()
    };
    assert!(!dir.exists());
}

#[test]
fn test_colliding_trait_columns_fail_at_load() {
    let params = format!("{PARAMETERS}G 16.7 SI,,1-4,,,Baseline,,\n");
    let err = PhaseTable::from_reader(params.as_bytes()).unwrap_err();
    match err {
        TraitError::Config(ConfigError::ColumnCollision { phase, column }) => {
            assert_eq!(phase, "G 16.7 SI");
            assert_eq!(column, "G 16.7 SI");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_time_column() {
    let csv = "Minute,R301\n1,2.0\n2,2.0\n";
    let err = load_perifusion_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        TraitError::Schema(SchemaError::MissingTimeColumn { .. })
    ));
}

#[test]
fn test_time_column_is_case_insensitive() {
    let csv = "R301,TIME\n2.0,1\n4.0,2\n";
    let data = load_perifusion_reader(csv.as_bytes()).unwrap();
    assert_eq!(data.time_column(), "TIME");
    assert_eq!(data.times(), &[1.0, 2.0]);
    assert_eq!(data.donor_ids(), vec!["R301"]);
}

#[test]
fn test_json_export() {
    let data = load_perifusion_reader(PERIFUSION.as_bytes()).unwrap();
    let phases = PhaseTable::from_reader(PARAMETERS.as_bytes()).unwrap();
    let table = compute_traits(&data, &phases, &TraitOptions::new("INS-IEQ")).unwrap();

    let json = table.to_json();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["Donor ID"], "R301");
    assert_eq!(json[0]["INS-IEQ G 16.7 SI"], 2.5);
    assert!(json[1]["INS-IEQ G 16.7 SI"].is_null());
}
