use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ColumnDtype – how the raw text of a column is interpreted
// ---------------------------------------------------------------------------

/// Numeric type a column is parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnDtype {
    #[serde(rename = "u64", alias = "uint64")]
    UInt64,
    #[serde(rename = "f64", alias = "float64")]
    Float64,
}

impl FromStr for ColumnDtype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u64" | "uint64" => Ok(ColumnDtype::UInt64),
            "f64" | "float64" => Ok(ColumnDtype::Float64),
            other => Err(format!("unknown dtype '{other}' (expected u64 or f64)")),
        }
    }
}

impl fmt::Display for ColumnDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnDtype::UInt64 => write!(f, "u64"),
            ColumnDtype::Float64 => write!(f, "f64"),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnValue – a single cell
// ---------------------------------------------------------------------------

/// One parsed cell. Floats compare by value with `-0.0 == 0.0`, and all NaNs
/// are equal to each other, so the type can live in hashed/ordered sets.
#[derive(Debug, Clone, Copy)]
pub enum ColumnValue {
    UInt(u64),
    Float(f64),
}

impl ColumnValue {
    pub fn is_nan(&self) -> bool {
        matches!(self, ColumnValue::Float(v) if v.is_nan())
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            ColumnValue::UInt(u) => *u as f64,
            ColumnValue::Float(v) => *v,
        }
    }

    /// Canonical float bits: folds `-0.0` into `0.0` and every NaN into one.
    fn float_key(v: f64) -> u64 {
        if v.is_nan() {
            f64::NAN.to_bits()
        } else if v == 0.0 {
            0.0f64.to_bits()
        } else {
            v.to_bits()
        }
    }
}

impl PartialEq for ColumnValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for ColumnValue {}

impl PartialOrd for ColumnValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ColumnValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use ColumnValue::*;
        match (self, other) {
            (UInt(a), UInt(b)) => a.cmp(b),
            (Float(a), Float(b)) => {
                let a = f64::from_bits(Self::float_key(*a));
                let b = f64::from_bits(Self::float_key(*b));
                a.total_cmp(&b)
            }
            (UInt(_), Float(_)) => std::cmp::Ordering::Less,
            (Float(_), UInt(_)) => std::cmp::Ordering::Greater,
        }
    }
}

impl std::hash::Hash for ColumnValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ColumnValue::UInt(u) => u.hash(state),
            ColumnValue::Float(v) => Self::float_key(*v).hash(state),
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::UInt(u) => write!(f, "{u}"),
            ColumnValue::Float(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – a whole loaded column
// ---------------------------------------------------------------------------

/// A named column held fully in memory.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnDtype,
    pub values: Vec<ColumnValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: ColumnDtype, values: Vec<ColumnValue>) -> Self {
        Column {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Number of rows, NaN included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values as `f64`, skipping NaN and infinities (what gets binned).
    pub fn finite_f64(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(ColumnValue::as_f64)
            .filter(|v| v.is_finite())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn dtype_parses_both_spellings() {
        assert_eq!("u64".parse::<ColumnDtype>().unwrap(), ColumnDtype::UInt64);
        assert_eq!("Float64".parse::<ColumnDtype>().unwrap(), ColumnDtype::Float64);
        assert!("i32".parse::<ColumnDtype>().is_err());
    }

    #[test]
    fn signed_zero_and_nan_collapse_in_sets() {
        let set: HashSet<ColumnValue> = [
            ColumnValue::Float(0.0),
            ColumnValue::Float(-0.0),
            ColumnValue::Float(f64::NAN),
            ColumnValue::Float(-f64::NAN),
            ColumnValue::Float(1.5),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn finite_values_skip_nan_and_inf() {
        let col = Column::new(
            "Dist",
            ColumnDtype::Float64,
            vec![
                ColumnValue::Float(1.0),
                ColumnValue::Float(f64::NAN),
                ColumnValue::Float(f64::INFINITY),
                ColumnValue::Float(2.0),
            ],
        );
        assert_eq!(col.len(), 4);
        assert_eq!(col.finite_f64(), vec![1.0, 2.0]);
    }
}
