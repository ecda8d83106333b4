use std::fs;
use std::path::Path;

use column_profiler::config::{ColumnSpec, ProfileConfig};
use column_profiler::data::model::ColumnDtype;
use column_profiler::pipeline;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

fn nyc_config(input: &Path, output: &Path) -> ProfileConfig {
    ProfileConfig {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn profiles_every_column_and_writes_outputs() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write(input.path(), "Pickup.txt", "100\n100\n200\n300\n");
    write(input.path(), "Dist.txt", "1.5\n2.5\n1.5\nnan\n");
    write(input.path(), "Tot.txt", "10.0\n\n10.0\n10.0\n");

    let out_dir = output.path().join("results");
    let config = nyc_config(input.path(), &out_dir);
    let report = pipeline::run(&config).unwrap();

    assert_eq!(report.columns.len(), 3);
    assert_eq!(
        fs::read_to_string(out_dir.join("uniques_cnt_Pickup")).unwrap(),
        "3 (75.00%)"
    );
    assert_eq!(
        fs::read_to_string(out_dir.join("uniques_cnt_Dist")).unwrap(),
        "2 (50.00%)"
    );
    assert_eq!(
        fs::read_to_string(out_dir.join("uniques_cnt_Tot")).unwrap(),
        "1 (33.33%)"
    );

    for col in ["Pickup", "Dist", "Tot"] {
        let png = fs::read(out_dir.join(format!("hist_NYC_{col}.png"))).unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
    }
    assert!(out_dir.join("profile_NYC.json").is_file());

    let dist = report.column("Dist").unwrap();
    assert_eq!(dist.title, "Distribution of NYC/Dist");
    assert_eq!(dist.histogram.bins(), 50);
    assert_eq!(dist.histogram.total(), 3);

    for col in &report.columns {
        assert!(col.unique <= col.rows);
    }
}

#[test]
fn custom_columns_and_bins() {
    let input = tempdir().unwrap();
    write(input.path(), "Fare.txt", "1\n2\n3\n4\n");

    let config = ProfileConfig {
        dataset: "Taxi".into(),
        columns: vec![ColumnSpec::new("Fare", ColumnDtype::Float64)],
        bins: 2,
        ..nyc_config(input.path(), input.path())
    };
    let report = pipeline::run(&config).unwrap();

    assert_eq!(report.columns[0].histogram.counts(), &[2, 2]);
    assert!(input.path().join("hist_Taxi_Fare.png").is_file());
}

#[test]
fn missing_column_file_aborts_with_context() {
    let input = tempdir().unwrap();
    write(input.path(), "Pickup.txt", "1\n");

    let config = nyc_config(input.path(), input.path());
    let err = pipeline::run(&config).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("NYC/Dist"), "{msg}");

    // the first column was finished before the failure
    assert!(input.path().join("uniques_cnt_Pickup").is_file());
    assert!(!input.path().join("uniques_cnt_Tot").exists());
}

#[test]
fn empty_column_is_rejected() {
    let input = tempdir().unwrap();
    write(input.path(), "Only.txt", "\n\n");

    let config = ProfileConfig {
        columns: vec![ColumnSpec::new("Only", ColumnDtype::UInt64)],
        ..nyc_config(input.path(), input.path())
    };
    let err = pipeline::run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("no rows"));
}

#[test]
fn invalid_config_is_rejected_before_any_io() {
    let input = tempdir().unwrap();
    let out_dir = input.path().join("never");
    let config = ProfileConfig {
        bins: 0,
        ..nyc_config(input.path(), &out_dir)
    };
    assert!(pipeline::run(&config).is_err());
    assert!(!out_dir.exists());
}
