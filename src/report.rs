use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::model::ColumnDtype;
use crate::histogram::Histogram;
use crate::stats::UniqueSummary;

/// Write the one-line `"<unique> (<ratio>%)"` summary, no trailing newline.
pub fn write_unique_summary(path: &Path, summary: &UniqueSummary) -> Result<()> {
    std::fs::write(path, summary.to_string())
        .with_context(|| format!("writing {}", path.display()))
}

// ---------------------------------------------------------------------------
// Machine-readable run report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ColumnReport {
    pub name: String,
    pub dtype: ColumnDtype,
    pub title: String,
    pub rows: usize,
    pub unique: usize,
    pub unique_ratio_pct: f64,
    pub histogram: Histogram,
    pub summary_path: PathBuf,
    pub histogram_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub dataset: String,
    pub columns: Vec<ColumnReport>,
}

impl ProfileReport {
    pub fn new(dataset: &str) -> Self {
        ProfileReport {
            dataset: dataset.to_string(),
            columns: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialising report")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }
}
