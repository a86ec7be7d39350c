//! In-memory ledger source for tests and embedding

use async_trait::async_trait;

use crate::traits::*;
use crate::types::*;

/// Ledger source backed by bytes already held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Create a source from raw bytes
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Create a source from CSV text
    pub fn from_csv(name: impl Into<String>, csv: &str) -> Self {
        Self::new(name, csv.as_bytes())
    }

    /// Size of the held export in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the held export is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[async_trait]
impl LedgerSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> ReconResult<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}
