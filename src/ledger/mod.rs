//! Ledger ingestion: record parsing and reference indexing

pub mod index;
pub mod parser;

pub use index::*;
pub use parser::*;
