//! Per-entity report processors.
//!
//! Each processor is a pure function from raw rows (plus reference tables) to
//! export-ready rows. Inventory and entries take the already processed
//! products so the product transform runs once per snapshot.

pub mod ecommerce;
pub mod entries;
pub mod inventory;
pub mod products;
pub mod sales;

pub use ecommerce::process_ecommerce;
pub use entries::process_entries;
pub use inventory::process_inventory;
pub use products::process_products;
pub use sales::process_sales;

use std::collections::HashMap;

use crate::constants::PRODUCT;
use crate::pipeline::processing::barcode::BarcodeStats;
use crate::pipeline::processing::color::ColorResolver;
use crate::pipeline::processing::transform::{normalized_key, DatePrecision};
use crate::types::Row;

/// Immutable knobs shared by all processors for one run
#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    /// Precision kept in canonical date columns
    pub date_precision: DatePrecision,
    /// Keep only the first row per NF_SAIDA/SERIE_NF/ITEM in the e-commerce report
    pub dedupe_ecommerce_items: bool,
    /// Color resolver with the fixed mapping table injected
    pub color_resolver: ColorResolver,
}

/// Processed products indexed by normalized product code.
///
/// When a code repeats, the last product row wins.
pub struct ProductLookup<'a> {
    by_code: HashMap<String, &'a Row>,
}

impl<'a> ProductLookup<'a> {
    pub fn build(products: &'a [Row]) -> Self {
        let mut by_code = HashMap::with_capacity(products.len());
        for product in products {
            let code = normalized_key(product, PRODUCT);
            if code.is_empty() {
                continue;
            }
            by_code.insert(code, product);
        }
        Self { by_code }
    }

    /// Product matching the row's PRODUTO column
    pub fn get(&self, row: &Row) -> Option<&'a Row> {
        let code = normalized_key(row, PRODUCT);
        if code.is_empty() {
            return None;
        }
        self.by_code.get(&code).copied()
    }
}

/// Copy the listed attributes from `source` onto `target`.
/// Attributes the source lacks are left alone on the target.
pub fn merge_attributes(target: &mut Row, source: &Row, attributes: &[&str]) {
    for &attribute in attributes {
        if let Some(value) = source.get(attribute) {
            target.insert(attribute.to_string(), value.clone());
        }
    }
}

fn record_barcode_stats(report: &str, stats: &BarcodeStats) {
    crate::observability::metrics::pipeline::barcode_matches(report, stats);
}
