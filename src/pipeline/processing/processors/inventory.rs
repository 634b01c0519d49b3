use crate::constants::{
    INVENTORY_COLUMNS_TO_DROP, INVENTORY_DATE_COLUMNS, INVENTORY_PRODUCT_ATTRIBUTES, INVENTORY_REPORT,
    REPLACEMENT_COST, STOCK_QUANTITY, STOCK_VALUE,
};
use crate::pipeline::processing::barcode::{enrich_with_barcode_stats, BarcodeOptions};
use crate::pipeline::processing::transform::{column_number, convert_dates_with, drop_columns, number_value};
use crate::types::{Row, Rows};

use super::{merge_attributes, record_barcode_stats, PipelineSettings, ProductLookup};

/// Inventory report.
///
/// Stock rows pick up product attributes from the processed products, get
/// `VALOR_TOTAL_ESTOQUE = ESTOQUE × CUSTO_REPOSICAO1`, lose cost history and
/// per-size slot columns, and are matched to barcodes down to size level.
pub fn process_inventory(
    inventory: &[Row],
    products: &[Row],
    barcodes: &[Row],
    settings: &PipelineSettings,
) -> Rows {
    if inventory.is_empty() {
        return Vec::new();
    }

    let lookup = ProductLookup::build(products);
    let merged: Rows = inventory
        .iter()
        .map(|row| {
            let mut next = row.clone();
            if let Some(product) = lookup.get(row) {
                merge_attributes(&mut next, product, INVENTORY_PRODUCT_ATTRIBUTES);
            }
            next
        })
        .collect();

    let converted = convert_dates_with(&merged, INVENTORY_DATE_COLUMNS, settings.date_precision);

    let with_totals: Rows = converted
        .iter()
        .map(|row| {
            let mut next = row.clone();
            let value = column_number(row, STOCK_QUANTITY) * column_number(row, REPLACEMENT_COST);
            next.insert(STOCK_VALUE.to_string(), number_value(value));
            next
        })
        .collect();

    let trimmed = drop_columns(&with_totals, INVENTORY_COLUMNS_TO_DROP.as_slice());
    let (enriched, stats) = enrich_with_barcode_stats(
        &trimmed,
        barcodes,
        BarcodeOptions { prioritize_size: true },
    );
    record_barcode_stats(INVENTORY_REPORT, &stats);
    enriched
}
