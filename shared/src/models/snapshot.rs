//! The atomically replaced dashboard data bundle.

use serde::{Deserialize, Serialize};

use super::{KpiBundle, StockRecord, TransactionRecord};

/// One consistent bundle of stock, KPI, and transaction data.
///
/// A refresh produces a whole new snapshot; readers still holding the
/// previous one keep a fully consistent view. There is no field-level
/// merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub stock: Vec<StockRecord>,
    pub kpis: KpiBundle,
    pub transactions: Vec<TransactionRecord>,
    pub summary: SnapshotSummary,
}

/// Server-side bookkeeping attached to a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSummary {
    pub total_products: u64,
    pub total_transactions: u64,
    /// Already formatted by the server; displayed verbatim.
    pub last_updated: String,
}
