//! Reconciliation of two transaction ledgers
//!
//! Matching pairs each record of ledger A with the first record of ledger B
//! sharing its reference. The aggregator then sums every partition and the
//! report bundles the result for presentation.

pub mod aggregator;
pub mod engine;
pub mod matcher;
pub mod report;

pub use aggregator::*;
pub use engine::*;
pub use matcher::*;
pub use report::*;
