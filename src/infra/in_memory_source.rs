use async_trait::async_trait;

use crate::app::ports::RawSnapshotSource;
use crate::error::Result;
use crate::types::RawSnapshot;

/// Source that hands out a clone of a snapshot held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotSource {
    snapshot: RawSnapshot,
}

impl InMemorySnapshotSource {
    pub fn new(snapshot: RawSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl RawSnapshotSource for InMemorySnapshotSource {
    async fn fetch(&self) -> Result<RawSnapshot> {
        Ok(self.snapshot.clone())
    }
}
