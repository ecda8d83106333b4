use anyhow::{Context, Result};

use crate::color::column_colour;
use crate::config::{ColumnSpec, ProfileConfig};
use crate::data::loader::load_column;
use crate::histogram::Histogram;
use crate::render::{render_histogram, save_png};
use crate::report::{write_unique_summary, ColumnReport, ProfileReport};
use crate::stats::UniqueSummary;

/// Profile every configured column in order, writing the summary file and
/// histogram image for each, then the JSON report.  Stops at the first
/// failing column.
pub fn run(config: &ProfileConfig) -> Result<ProfileReport> {
    config.validate().context("invalid configuration")?;
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let mut report = ProfileReport::new(&config.dataset);
    let total = config.columns.len();

    for (index, spec) in config.columns.iter().enumerate() {
        let column_report = profile_column(config, spec, index, total)
            .with_context(|| format!("profiling {}/{}", config.dataset, spec.name))?;
        report.columns.push(column_report);
    }

    let report_path = config.report_path();
    report.write_json(&report_path)?;
    log::info!("Report written to {}", report_path.display());

    Ok(report)
}

fn profile_column(
    config: &ProfileConfig,
    spec: &ColumnSpec,
    index: usize,
    total: usize,
) -> Result<ColumnReport> {
    log::info!("Processing {}/{}", config.dataset, spec.name);

    let input = config.input_path(&spec.name);
    let mut column = load_column(&input, spec.dtype)
        .with_context(|| format!("loading {}", input.display()))?;
    // the configured name wins over the file stem
    column.name = spec.name.clone();
    log::info!("Data loaded into memory.");

    let summary = UniqueSummary::from_column(&column)?;
    log::info!(
        "{} unique elements ({:.2}%).",
        summary.unique,
        summary.ratio()
    );
    let summary_path = config.summary_path(&spec.name);
    write_unique_summary(&summary_path, &summary)?;

    let histogram = Histogram::compute(&column.finite_f64(), config.bins)?;
    if histogram.total() < column.len() as u64 {
        log::warn!(
            "{} non-finite values left out of the {} histogram",
            column.len() as u64 - histogram.total(),
            spec.name
        );
    }
    let title = format!("Distribution of {}/{}", config.dataset, spec.name);
    let image = render_histogram(&histogram, &config.figure, column_colour(index, total));
    let histogram_path = config.histogram_path(&spec.name);
    save_png(&image, &histogram_path)?;
    log::debug!("{title} -> {}", histogram_path.display());
    log::info!("Histograms generated.");

    Ok(ColumnReport {
        name: spec.name.clone(),
        dtype: spec.dtype,
        title,
        rows: summary.rows,
        unique: summary.unique,
        unique_ratio_pct: summary.ratio(),
        histogram,
        summary_path,
        histogram_path,
    })
}
