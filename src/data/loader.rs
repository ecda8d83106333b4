use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, UInt64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{Column, ColumnDtype, ColumnValue};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}:{line}: expected a single value, found {fields} fields")]
    FieldCount {
        path: PathBuf,
        line: u64,
        fields: usize,
    },

    #[error("{path}:{line}: '{token}' is not a valid {dtype}")]
    Parse {
        path: PathBuf,
        line: u64,
        token: String,
        dtype: ColumnDtype,
    },

    #[error("reading parquet file {path}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("reading record batch from {path}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("{path}: unsupported column type {data_type}")]
    UnsupportedType { path: PathBuf, data_type: String },

    #[error("{path}: parquet file has no columns")]
    NoColumns { path: PathBuf },

    #[error("{path}: row {row}: {reason}")]
    BadCell {
        path: PathBuf,
        row: usize,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a single column from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.txt` / `.csv` / no extension – one value per line, no header
/// * `.parquet` / `.pq` – the first column of the file
///
/// The column is named after the file stem.
pub fn load_column(path: &Path, dtype: ColumnDtype) -> Result<Column, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string();

    let values = match ext.as_str() {
        "" | "txt" | "csv" => load_lines(path, dtype)?,
        "parquet" | "pq" => load_parquet(path, dtype)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    log::debug!("read {} values from {}", values.len(), path.display());
    Ok(Column::new(name, dtype, values))
}

// ---------------------------------------------------------------------------
// Line-delimited loader
// ---------------------------------------------------------------------------

/// One value per line.  Blank lines are skipped; surrounding whitespace is
/// ignored.  A line holding a delimiter is rejected rather than truncated.
fn load_lines(path: &Path, dtype: ColumnDtype) -> Result<Vec<ColumnValue>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut values = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != 1 {
            return Err(LoadError::FieldCount {
                path: path.to_path_buf(),
                line,
                fields: record.len(),
            });
        }

        let token = record[0].trim();
        if token.is_empty() {
            continue;
        }

        let value = parse_value(token, dtype).ok_or_else(|| LoadError::Parse {
            path: path.to_path_buf(),
            line,
            token: token.to_string(),
            dtype,
        })?;
        values.push(value);
    }

    Ok(values)
}

fn parse_value(token: &str, dtype: ColumnDtype) -> Option<ColumnValue> {
    match dtype {
        ColumnDtype::UInt64 => token.parse::<u64>().ok().map(ColumnValue::UInt),
        ColumnDtype::Float64 => token.parse::<f64>().ok().map(ColumnValue::Float),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Read the first column of every record batch.
///
/// Accepted physical types:
/// - `u64` columns: any unsigned int, and signed ints holding non-negative values
/// - `f64` columns: any int or float width
fn load_parquet(path: &Path, dtype: ColumnDtype) -> Result<Vec<ColumnValue>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(parquet_err)?
        .build()
        .map_err(parquet_err)?;

    let mut values = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|source| LoadError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        if batch.num_columns() == 0 {
            return Err(LoadError::NoColumns {
                path: path.to_path_buf(),
            });
        }

        let col = widen_column(batch.column(0)).map_err(|err| match err {
            WidenError::Unsupported(data_type) => LoadError::UnsupportedType {
                path: path.to_path_buf(),
                data_type: format!("{data_type:?}"),
            },
            WidenError::Cast(source) => LoadError::Arrow {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let offset = values.len();
        for row in 0..batch.num_rows() {
            let value = extract_value(&col, row, dtype).map_err(|reason| LoadError::BadCell {
                path: path.to_path_buf(),
                row: offset + row,
                reason,
            })?;
            values.push(value);
        }
    }

    Ok(values)
}

// -- Arrow helpers --

enum WidenError {
    Unsupported(DataType),
    Cast(arrow::error::ArrowError),
}

/// Widen any int/float column to Int64, UInt64 or Float64 so cell access only
/// has three array types to deal with.  Nulls survive the cast.
fn widen_column(col: &ArrayRef) -> Result<ArrayRef, WidenError> {
    let target = match col.data_type() {
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => DataType::Int64,
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            DataType::UInt64
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 => DataType::Float64,
        other => return Err(WidenError::Unsupported(other.clone())),
    };
    if col.data_type() == &target {
        return Ok(Arc::clone(col));
    }
    cast(col, &target).map_err(WidenError::Cast)
}

/// Read one cell of a column already passed through [`widen_column`].
fn extract_value(col: &ArrayRef, row: usize, dtype: ColumnDtype) -> Result<ColumnValue, String> {
    if col.is_null(row) {
        return Err("null value".to_string());
    }

    let mismatch = || format!("unexpected array type for {:?}", col.data_type());

    match col.data_type() {
        DataType::UInt64 => {
            let v = col.as_any().downcast_ref::<UInt64Array>().ok_or_else(mismatch)?.value(row);
            Ok(match dtype {
                ColumnDtype::UInt64 => ColumnValue::UInt(v),
                ColumnDtype::Float64 => ColumnValue::Float(v as f64),
            })
        }
        DataType::Int64 => {
            let v = col.as_any().downcast_ref::<Int64Array>().ok_or_else(mismatch)?.value(row);
            match dtype {
                ColumnDtype::UInt64 => u64::try_from(v)
                    .map(ColumnValue::UInt)
                    .map_err(|_| format!("negative value {v} in u64 column")),
                ColumnDtype::Float64 => Ok(ColumnValue::Float(v as f64)),
            }
        }
        DataType::Float64 => {
            let v = col.as_any().downcast_ref::<Float64Array>().ok_or_else(mismatch)?.value(row);
            match dtype {
                ColumnDtype::Float64 => Ok(ColumnValue::Float(v)),
                ColumnDtype::UInt64 => Err(format!("float value {v} in u64 column")),
            }
        }
        other => Err(format!("unexpected column type {other:?}")),
    }
}
