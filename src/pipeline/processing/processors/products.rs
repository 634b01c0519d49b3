use crate::constants::{PRODUCTS_REPORT, PRODUCT_COLUMNS_TO_DROP, PRODUCT_DATE_COLUMNS};
use crate::pipeline::processing::barcode::{enrich_with_barcode_stats, BarcodeOptions};
use crate::pipeline::processing::transform::{convert_dates_with, drop_columns};
use crate::types::{Row, Rows};

use super::{record_barcode_stats, PipelineSettings};

/// Products report: cadastral dates, technical columns pruned, barcode by
/// product+color then product.
pub fn process_products(products: &[Row], barcodes: &[Row], settings: &PipelineSettings) -> Rows {
    let converted = convert_dates_with(products, PRODUCT_DATE_COLUMNS, settings.date_precision);
    let trimmed = drop_columns(&converted, PRODUCT_COLUMNS_TO_DROP);
    let (enriched, stats) = enrich_with_barcode_stats(
        &trimmed,
        barcodes,
        BarcodeOptions { prioritize_size: false },
    );
    record_barcode_stats(PRODUCTS_REPORT, &stats);
    enriched
}
