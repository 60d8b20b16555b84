//! Integration tests for CSV round trips through the resample and inspect commands

use smotewb::cli::{csv_loader, run_inspect, run_resample};
use smotewb::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn write_dataset() -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    writeln!(file, "x1,x2,class").unwrap();
    for i in 0..24 {
        writeln!(file, "{},{},0", (i % 6) as f64, (i / 6) as f64 * 1.5).unwrap();
    }
    for (a, b) in [(12.0, 12.0), (12.5, 12.2), (12.2, 12.6), (12.8, 12.4)] {
        writeln!(file, "{},{},1", a, b).unwrap();
    }
    file
}

fn config() -> SmoteWBConfig {
    SmoteWBConfig::new().with_n_iters(25).with_random_state(17)
}

#[test]
fn test_resample_writes_balanced_csv() {
    let input = write_dataset();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("balanced.csv");

    let summary = run_resample(&DataLoader::new(), input.path(), "class", &output, config()).unwrap();

    assert_eq!(summary.rows_before, 28);
    assert_eq!(summary.rows_after, 48);
    assert_eq!(summary.n_synthetic, 20);
    assert_eq!(summary.counts_before[&1], 4);
    assert_eq!(summary.counts_after[&1], 24);
    assert_eq!(summary.outcome, ResampleOutcome::Oversampled);

    let written = DataLoader::new()
        .load_labelled(output.to_str().unwrap(), "class")
        .unwrap();
    assert_eq!(written.n_samples(), 48);
    assert_eq!(written.feature_names, vec!["x1".to_string(), "x2".to_string()]);
    assert!(written.y.iter().skip(28).all(|&l| l == 1));
}

#[test]
fn test_resample_summary_serializes() {
    let input = write_dataset();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let summary = run_resample(&DataLoader::new(), input.path(), "class", &output, config()).unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["n_synthetic"], 20);
    assert_eq!(json["outcome"], "Oversampled");
    assert_eq!(json["counts_after"]["0"], 24);
}

#[test]
fn test_resample_unknown_target_fails() {
    let input = write_dataset();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    assert!(run_resample(&DataLoader::new(), input.path(), "label", &output, config()).is_err());
    assert!(!output.exists());
}

#[test]
fn test_inspect_reports_categories() {
    let input = write_dataset();
    let report = run_inspect(&DataLoader::new(), input.path(), "class", config()).unwrap();

    assert_eq!(report.minority_label, Some(1));
    assert_eq!(report.n_to_sample, 20);
    assert_eq!(report.k_max, 6);
    assert_eq!(report.good + report.lonely + report.bad, 4);
    assert!(!report.fallback);
}

#[test]
fn test_inspect_single_class() {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    writeln!(file, "a,class").unwrap();
    writeln!(file, "1.0,3").unwrap();
    writeln!(file, "2.0,3").unwrap();

    let report = run_inspect(&DataLoader::new(), file.path(), "class", config()).unwrap();
    assert_eq!(report.minority_label, None);
    assert_eq!(report.counts[&3], 2);
}

#[test]
fn test_semicolon_separated_input() {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    writeln!(file, "x1;x2;class").unwrap();
    for i in 0..24 {
        writeln!(file, "{};{};0", (i % 6) as f64, (i / 6) as f64 * 1.5).unwrap();
    }
    for (a, b) in [(12.0, 12.0), (12.5, 12.2), (12.2, 12.6), (12.8, 12.4)] {
        writeln!(file, "{};{};1", a, b).unwrap();
    }

    let loader = csv_loader(';').unwrap();
    let report = run_inspect(&loader, file.path(), "class", config()).unwrap();
    assert_eq!(report.counts[&0], 24);
    assert_eq!(report.n_to_sample, 20);

    assert!(csv_loader('§').is_err());
}
