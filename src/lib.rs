//! Per-column cardinality and distribution profiling.
//!
//! For each configured column: load → count uniques → write summary →
//! bin → render histogram PNG.  See [`pipeline::run`].

pub mod color;
pub mod config;
pub mod data;
pub mod histogram;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod stats;
