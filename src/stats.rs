use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::data::model::{Column, ColumnValue};

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("column '{0}' has no rows")]
    EmptyColumn(String),
}

/// Number of distinct non-NaN values in the column.
pub fn unique_count(column: &Column) -> usize {
    column
        .values
        .iter()
        .filter(|v| !v.is_nan())
        .collect::<HashSet<&ColumnValue>>()
        .len()
}

// ---------------------------------------------------------------------------
// UniqueSummary – what ends up in `uniques_cnt_<column>`
// ---------------------------------------------------------------------------

/// Cardinality of one column relative to its row count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueSummary {
    pub column: String,
    pub rows: usize,
    pub unique: usize,
}

impl UniqueSummary {
    pub fn from_column(column: &Column) -> Result<Self, StatsError> {
        if column.is_empty() {
            return Err(StatsError::EmptyColumn(column.name.clone()));
        }
        Ok(UniqueSummary {
            column: column.name.clone(),
            rows: column.len(),
            unique: unique_count(column),
        })
    }

    /// Unique values as a percentage of all rows (NaN rows count as rows).
    pub fn ratio(&self) -> f64 {
        self.unique as f64 / self.rows as f64 * 100.0
    }
}

impl fmt::Display for UniqueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}%)", self.unique, self.ratio())
    }
}
