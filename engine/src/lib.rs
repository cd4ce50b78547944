//! Stock dashboard engine: UI state machine, API client, view models.
//!
//! The engine is the imperative shell around the pure `shared` core: it
//! owns the loaded snapshot and the UI state, talks to the analytics
//! service, and hands renderers immutable view models. The browser
//! shell drives it through the WASM adapter; `sdb-headless` drives it
//! from the command line against a live service.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod view;

pub use config::Config;
