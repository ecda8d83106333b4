/// Data layer: column types and loading.
///
/// Architecture:
/// ```text
///  <column>.txt / <column>.parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Column   │  name, dtype, Vec<ColumnValue>
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
