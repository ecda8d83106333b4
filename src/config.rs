use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::model::ColumnDtype;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid column spec '{0}': expected NAME:DTYPE")]
    ColumnSpec(String),

    #[error("{0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Column and figure settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub dtype: ColumnDtype,
}

impl ColumnSpec {
    pub fn new(name: &str, dtype: ColumnDtype) -> Self {
        ColumnSpec {
            name: name.to_string(),
            dtype,
        }
    }
}

/// `Pickup:u64` / `Dist:f64`
impl FromStr for ColumnSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, dtype) = s
            .split_once(':')
            .ok_or_else(|| ConfigError::ColumnSpec(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::ColumnSpec(s.to_string()));
        }
        let dtype = dtype
            .parse::<ColumnDtype>()
            .map_err(|_| ConfigError::ColumnSpec(s.to_string()))?;
        Ok(ColumnSpec::new(name, dtype))
    }
}

/// Output image geometry in inches and dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Figure {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Default for Figure {
    fn default() -> Self {
        Figure {
            width_in: 4.0,
            height_in: 4.0,
            dpi: 144,
        }
    }
}

/// Largest canvas side accepted, in pixels.
pub const MAX_FIGURE_PX: f64 = 16384.0;

impl Figure {
    /// Canvas size before rounding; may be huge or non-finite for bad input.
    fn pixel_size_f64(&self) -> (f64, f64) {
        (
            self.width_in * self.dpi as f64,
            self.height_in * self.dpi as f64,
        )
    }

    /// Only meaningful once [`ProfileConfig::validate`] has passed.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f64).round() as u32,
            (self.height_in * self.dpi as f64).round() as u32,
        )
    }
}

// ---------------------------------------------------------------------------
// ProfileConfig
// ---------------------------------------------------------------------------

/// Everything a profiling run needs.  Missing keys in a JSON file fall back
/// to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub dataset: String,
    pub columns: Vec<ColumnSpec>,
    pub bins: usize,
    pub figure: Figure,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        ProfileConfig {
            dataset: "NYC".to_string(),
            columns: vec![
                ColumnSpec::new("Pickup", ColumnDtype::UInt64),
                ColumnSpec::new("Dist", ColumnDtype::Float64),
                ColumnSpec::new("Tot", ColumnDtype::Float64),
            ],
            bins: 50,
            figure: Figure::default(),
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ProfileConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.trim().is_empty() {
            return Err(ConfigError::Invalid("dataset name is empty".into()));
        }
        if self.columns.is_empty() {
            return Err(ConfigError::Invalid("no columns configured".into()));
        }
        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "column '{}' listed more than once",
                    col.name
                )));
            }
        }
        if self.bins == 0 {
            return Err(ConfigError::Invalid("bins must be at least 1".into()));
        }
        if !(self.figure.width_in > 0.0 && self.figure.height_in > 0.0) || self.figure.dpi == 0 {
            return Err(ConfigError::Invalid(
                "figure size and dpi must be positive".into(),
            ));
        }
        let (w, h) = self.figure.pixel_size_f64();
        if !(w.round() <= MAX_FIGURE_PX && h.round() <= MAX_FIGURE_PX) {
            return Err(ConfigError::Invalid(format!(
                "figure of {w:.0}x{h:.0} px exceeds {MAX_FIGURE_PX} px per side"
            )));
        }
        if w.round() < 32.0 || h.round() < 32.0 {
            return Err(ConfigError::Invalid(format!(
                "figure of {w:.0}x{h:.0} px is too small to draw"
            )));
        }
        Ok(())
    }

    /// `<input_dir>/<column>.txt`, or the `.parquet` sibling if only that exists.
    pub fn input_path(&self, column: &str) -> PathBuf {
        let txt = self.input_dir.join(format!("{column}.txt"));
        if txt.exists() {
            return txt;
        }
        let parquet = self.input_dir.join(format!("{column}.parquet"));
        if parquet.exists() {
            parquet
        } else {
            txt
        }
    }

    pub fn summary_path(&self, column: &str) -> PathBuf {
        self.output_dir.join(format!("uniques_cnt_{column}"))
    }

    pub fn histogram_path(&self, column: &str) -> PathBuf {
        self.output_dir
            .join(format!("hist_{}_{column}.png", self.dataset))
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(format!("profile_{}.json", self.dataset))
    }
}

// ---------------------------------------------------------------------------
// Layering: defaults < config file < command line
// ---------------------------------------------------------------------------

/// Values given on the command line.  `None` / empty means "keep what the
/// file or the defaults say"; a non-empty `columns` replaces the whole list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub dataset: Option<String>,
    pub columns: Vec<ColumnSpec>,
    pub bins: Option<usize>,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl ProfileConfig {
    /// Start from `file` (or the defaults when absent) and apply `overrides`.
    pub fn layered(file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => ProfileConfig::from_json_file(path)?,
            None => ProfileConfig::default(),
        };
        if let Some(dataset) = overrides.dataset {
            config.dataset = dataset;
        }
        if !overrides.columns.is_empty() {
            config.columns = overrides.columns;
        }
        if let Some(bins) = overrides.bins {
            config.bins = bins;
        }
        if let Some(dir) = overrides.input_dir {
            config.input_dir = dir;
        }
        if let Some(dir) = overrides.output_dir {
            config.output_dir = dir;
        }
        Ok(config)
    }
}
