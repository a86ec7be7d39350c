//! # Reconciliation Core
//!
//! A ledger reconciliation library: given two independently produced
//! transaction exports, find which transactions correspond, which do not,
//! and compute exact decimal totals for every bucket.
//!
//! ## Features
//!
//! - **Tolerant parsing**: CSV exports with a header row; malformed amounts become zero and are reported
//! - **Reference matching**: first-match pairing by transaction reference, duplicates evaluated independently
//! - **Exact totals**: matched, unmatched and grand totals summed with `BigDecimal`
//! - **Integrity checks**: partition identities, shared and shadowed counterparts
//! - **Source abstraction**: trait-based ingestion of raw ledger bytes
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{ReconciliationConfig, ReconciliationEngine};
//!
//! let a = "Transaction_reference,Amount\nT1,100\nT2,50\n";
//! let b = "Transaction_reference,Amount\nT1,100\nT3,30\n";
//!
//! let engine = ReconciliationEngine::with_config(
//!     ReconciliationConfig::new().labels("DDIN", "Efashe"),
//! )
//! .unwrap();
//! let report = engine.reconcile_csv(a.as_bytes(), b.as_bytes()).unwrap();
//!
//! assert_eq!(report.matched().len(), 1);
//! assert_eq!(report.unmatched_a()[0].record.reference, "T2");
//! assert_eq!(report.unmatched_b()[0].record.reference, "T3");
//! ```

pub mod config;
pub mod ledger;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;

pub use utils::validation::{check_report_integrity, IntegrityReport};
