use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One tabular record: column name to scalar value, in column order.
pub type Row = Map<String, Value>;

/// A collection of rows as produced by one pipeline stage.
pub type Rows = Vec<Row>;

/// Raw extracts fetched from the retail database, before any enrichment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub products: Rows,
    pub inventory: Rows,
    pub sales: Rows,
    pub ecommerce: Rows,
    pub entries: Rows,
    /// PRODUTO / COR_PRODUTO / TAMANHO / CODIGO_BARRA reference rows
    pub barcodes: Rows,
    /// COR / DESC_COR basic colors table
    pub colors: Rows,
}

/// The five export-ready reports produced from one snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedReports {
    pub products: Rows,
    pub inventory: Rows,
    pub sales: Rows,
    pub ecommerce: Rows,
    pub entries: Rows,
}

impl ProcessedReports {
    /// Report name and rows, in the order the reports are computed
    pub fn named(&self) -> [(&'static str, &Rows); 5] {
        [
            (crate::constants::PRODUCTS_REPORT, &self.products),
            (crate::constants::INVENTORY_REPORT, &self.inventory),
            (crate::constants::SALES_REPORT, &self.sales),
            (crate::constants::ECOMMERCE_REPORT, &self.ecommerce),
            (crate::constants::ENTRIES_REPORT, &self.entries),
        ]
    }

    pub fn total_rows(&self) -> usize {
        self.named().iter().map(|(_, rows)| rows.len()).sum()
    }
}
