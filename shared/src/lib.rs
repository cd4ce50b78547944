//! Shared types and pure presentation logic for the stock dashboard.
//!
//! This crate is the functional core shared between the engine, the
//! frontend (via WASM), and tests: domain models, the table engine, the
//! chart pipeline, KPI detail presentation, and display formatting.
//! No I/O and no async; everything compiles for `wasm32-unknown-unknown`.

pub mod charts;
pub mod detail;
pub mod format;
pub mod models;
pub mod table;
pub mod validation;

pub use models::*;
pub use validation::*;
