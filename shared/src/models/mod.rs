//! Shared data models for the stock analytics dashboard

pub(crate) mod de;

mod chart;
mod forecast;
mod kpi;
mod snapshot;
mod stock;
mod transaction;

pub use chart::*;
pub use forecast::*;
pub use kpi::*;
pub use snapshot::*;
pub use stock::*;
pub use transaction::*;
