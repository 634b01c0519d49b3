use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::app::ports::RawSnapshotSource;
use crate::constants::{
    BARCODES_INPUT_FILE, COLORS_INPUT_FILE, ECOMMERCE_INPUT_FILE, ENTRIES_INPUT_FILE,
    INVENTORY_INPUT_FILE, PRODUCTS_INPUT_FILE, SALES_INPUT_FILE,
};
use crate::error::{PipelineError, Result};
use crate::types::{RawSnapshot, Rows};

/// Reads a raw snapshot from a directory holding one JSON array per extract.
///
/// Missing files are empty extracts. A file that exists but cannot be read
/// or is not an array of objects fails the whole fetch.
#[derive(Debug, Clone)]
pub struct FsSnapshotSource {
    dir: PathBuf,
}

impl FsSnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read_rows(&self, file_name: &str) -> Result<Rows> {
        let path = self.dir.join(file_name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Extract file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(PipelineError::Fetch(format!(
                    "Failed to read '{}': {}",
                    path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            PipelineError::Fetch(format!(
                "'{}' is not a JSON array of objects: {}",
                path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl RawSnapshotSource for FsSnapshotSource {
    async fn fetch(&self) -> Result<RawSnapshot> {
        if !self.dir.is_dir() {
            return Err(PipelineError::Fetch(format!(
                "Snapshot directory '{}' does not exist",
                self.dir.display()
            )));
        }

        let snapshot = RawSnapshot {
            products: self.read_rows(PRODUCTS_INPUT_FILE).await?,
            inventory: self.read_rows(INVENTORY_INPUT_FILE).await?,
            sales: self.read_rows(SALES_INPUT_FILE).await?,
            ecommerce: self.read_rows(ECOMMERCE_INPUT_FILE).await?,
            entries: self.read_rows(ENTRIES_INPUT_FILE).await?,
            barcodes: self.read_rows(BARCODES_INPUT_FILE).await?,
            colors: self.read_rows(COLORS_INPUT_FILE).await?,
        };
        info!(dir = %self.dir.display(), "Loaded raw snapshot from disk");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_files_are_empty_collections() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("sales.json"),
            r#"[{"PRODUTO": "A1", "QTDE": 1}]"#,
        )
        .unwrap();

        let snapshot = FsSnapshotSource::new(dir.path()).fetch().await.unwrap();
        assert_eq!(snapshot.sales.len(), 1);
        assert!(snapshot.products.is_empty());
        assert!(snapshot.colors.is_empty());
    }

    #[tokio::test]
    async fn test_column_order_is_preserved() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("products.json"), r#"[{"Z": 1, "A": 2, "M": 3}]"#).unwrap();

        let snapshot = FsSnapshotSource::new(dir.path()).fetch().await.unwrap();
        let keys: Vec<&String> = snapshot.products[0].keys().collect();
        assert_eq!(keys, vec!["Z", "A", "M"]);
    }

    #[tokio::test]
    async fn test_malformed_file_fails_fetch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("inventory.json"), r#"{"not": "an array"}"#).unwrap();

        let result = FsSnapshotSource::new(dir.path()).fetch().await;
        assert!(matches!(result, Err(PipelineError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_missing_directory_fails_fetch() {
        let dir = TempDir::new().unwrap();
        let result = FsSnapshotSource::new(dir.path().join("nope")).fetch().await;
        assert!(matches!(result, Err(PipelineError::Fetch(_))));
    }
}
