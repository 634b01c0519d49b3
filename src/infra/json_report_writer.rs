use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::app::ports::ReportOutputPort;
use crate::constants::report_output_file;
use crate::error::{PipelineError, Result};
use crate::types::ProcessedReports;

/// Writes each report as a pretty-printed JSON array under one directory
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    dir: PathBuf,
}

impl JsonReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a report is written to
    pub fn report_path(&self, report: &str) -> PathBuf {
        self.dir.join(format!("{}.json", report_output_file(report)))
    }
}

#[async_trait]
impl ReportOutputPort for JsonReportWriter {
    async fn write_reports(&self, reports: &ProcessedReports) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            PipelineError::Output(format!(
                "Failed to create output directory '{}': {}",
                self.dir.display(),
                e
            ))
        })?;

        for (report, rows) in reports.named() {
            let path = self.report_path(report);
            let body = serde_json::to_vec_pretty(rows)?;
            tokio::fs::write(&path, body).await.map_err(|e| {
                PipelineError::Output(format!("Failed to write '{}': {}", path.display(), e))
            })?;
            info!(report, rows = rows.len(), path = %path.display(), "Report written");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_one_file_per_report() {
        let dir = TempDir::new().unwrap();
        let writer = JsonReportWriter::new(dir.path().join("out"));

        let mut reports = ProcessedReports::default();
        reports.sales = vec![json!({"QTDE": 2, "VALOR_LIQUIDO": 190, "PRODUTO": "A1"})
            .as_object()
            .cloned()
            .unwrap()];

        writer.write_reports(&reports).await.unwrap();

        for name in ["produtos_tratados", "estoque_tratados", "vendas_tratadas", "ecommerce", "entradas"] {
            assert!(dir.path().join("out").join(format!("{}.json", name)).exists(), "{} missing", name);
        }

        let sales = std::fs::read_to_string(writer.report_path("sales")).unwrap();
        let parsed: Value = serde_json::from_str(&sales).unwrap();
        assert_eq!(parsed[0]["VALOR_LIQUIDO"], json!(190));
        // column order survives serialization
        let qtde = sales.find("QTDE").unwrap();
        let produto = sales.find("PRODUTO").unwrap();
        assert!(qtde < produto);
    }
}
