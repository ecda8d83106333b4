use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use column_profiler::config::{ColumnSpec, ConfigOverrides, ProfileConfig};
use column_profiler::pipeline;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Unique-value counts and histograms for line-delimited numeric columns"
)]
struct Args {
    /// JSON config file; flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset name used in output file names.
    #[arg(short, long)]
    dataset: Option<String>,

    /// Column to profile as NAME:DTYPE (u64 or f64); repeatable.
    #[arg(long = "column", value_name = "NAME:DTYPE")]
    columns: Vec<ColumnSpec>,

    /// Number of histogram bins.
    #[arg(short, long)]
    bins: Option<usize>,

    /// Directory holding `<column>.txt` files.
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Directory receiving summaries, images and the report.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<ProfileConfig> {
        let overrides = ConfigOverrides {
            dataset: self.dataset,
            columns: self.columns,
            bins: self.bins,
            input_dir: self.input_dir,
            output_dir: self.output_dir,
        };
        Ok(ProfileConfig::layered(self.config.as_deref(), overrides)?)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse()
        .into_config()
        .context("building configuration")?;
    log::debug!("{config:?}");

    let report = pipeline::run(&config)?;
    log::info!(
        "Profiled {} column(s) of {}",
        report.columns.len(),
        report.dataset
    );
    Ok(())
}
