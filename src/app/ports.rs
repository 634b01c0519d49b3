use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ProcessedReports, RawSnapshot};

/// Supplies one raw snapshot of every extract the pipeline consumes.
#[async_trait]
pub trait RawSnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<RawSnapshot>;
}

/// Receives the finished reports for export.
#[async_trait]
pub trait ReportOutputPort: Send + Sync {
    async fn write_reports(&self, reports: &ProcessedReports) -> Result<()>;
}
