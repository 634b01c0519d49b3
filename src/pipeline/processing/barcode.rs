use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

use crate::constants::{BARCODE, PRODUCT, PRODUCT_COLOR, SIZE};
use crate::pipeline::processing::transform::{is_truthy, value_as_key};
use crate::types::{Row, Rows};

const KEY_SEPARATOR: &str = "::";

/// Options for barcode enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarcodeOptions {
    /// Try the product+color+size key before the coarser keys
    pub prioritize_size: bool,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self { prioritize_size: true }
    }
}

/// Which key level produced a row's barcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeMatch {
    ProductColorSize,
    ProductColor,
    Product,
    Unmatched,
}

impl BarcodeMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarcodeMatch::ProductColorSize => "product_color_size",
            BarcodeMatch::ProductColor => "product_color",
            BarcodeMatch::Product => "product",
            BarcodeMatch::Unmatched => "unmatched",
        }
    }
}

/// Per-tier match counts for one enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeStats {
    pub product_color_size: usize,
    pub product_color: usize,
    pub product: usize,
    pub unmatched: usize,
}

impl BarcodeStats {
    fn record(&mut self, tier: BarcodeMatch) {
        match tier {
            BarcodeMatch::ProductColorSize => self.product_color_size += 1,
            BarcodeMatch::ProductColor => self.product_color += 1,
            BarcodeMatch::Product => self.product += 1,
            BarcodeMatch::Unmatched => self.unmatched += 1,
        }
    }

    pub fn matched(&self) -> usize {
        self.product_color_size + self.product_color + self.product
    }
}

/// Build a lookup key: each part trimmed, uppercased and joined
pub fn barcode_key(parts: &[Option<&serde_json::Value>]) -> String {
    parts
        .iter()
        .map(|part| part.map(value_as_key).unwrap_or_default().trim().to_uppercase())
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

fn row_keys(row: &Row) -> (String, String, String) {
    let product = row.get(PRODUCT);
    let color = row.get(PRODUCT_COLOR);
    let size = row.get(SIZE);
    (
        barcode_key(&[product]),
        barcode_key(&[product, color]),
        barcode_key(&[product, color, size]),
    )
}

/// Three-level index over the barcode reference table.
///
/// Each level maps a key to the position of the first barcode row that
/// produced it; later rows with the same key are ignored.
#[derive(Debug)]
pub struct BarcodeIndex<'a> {
    rows: &'a [Row],
    by_product: HashMap<String, usize>,
    by_product_color: HashMap<String, usize>,
    by_product_color_size: HashMap<String, usize>,
}

impl<'a> BarcodeIndex<'a> {
    pub fn build(barcode_rows: &'a [Row]) -> Self {
        let mut by_product = HashMap::new();
        let mut by_product_color = HashMap::new();
        let mut by_product_color_size = HashMap::new();

        for (position, row) in barcode_rows.iter().enumerate() {
            if !row.get(PRODUCT).map(is_truthy).unwrap_or(false) {
                continue;
            }
            let (product, product_color, product_color_size) = row_keys(row);
            insert_first(&mut by_product, product, position);
            insert_first(&mut by_product_color, product_color, position);
            insert_first(&mut by_product_color_size, product_color_size, position);
        }

        Self {
            rows: barcode_rows,
            by_product,
            by_product_color,
            by_product_color_size,
        }
    }

    /// Find the barcode for a row, walking the key levels in priority order
    pub fn lookup(&self, row: &Row, options: BarcodeOptions) -> Option<(&'a serde_json::Value, BarcodeMatch)> {
        let (product, product_color, product_color_size) = row_keys(row);
        if product.is_empty() {
            return None;
        }

        let mut candidates = Vec::with_capacity(3);
        if options.prioritize_size {
            candidates.push((
                self.by_product_color_size.get(&product_color_size),
                BarcodeMatch::ProductColorSize,
            ));
        }
        candidates.push((self.by_product_color.get(&product_color), BarcodeMatch::ProductColor));
        candidates.push((self.by_product.get(&product), BarcodeMatch::Product));

        let rows: &'a [Row] = self.rows;
        candidates.into_iter().find_map(|(position, tier)| {
            let barcode = position.and_then(|&p| rows[p].get(BARCODE))?;
            is_truthy(barcode).then_some((barcode, tier))
        })
    }
}

fn insert_first(index: &mut HashMap<String, usize>, key: String, position: usize) {
    if let Entry::Vacant(slot) = index.entry(key) {
        slot.insert(position);
    }
}

/// Set `CODIGO_BARRA` on every row that matches the barcode table.
pub fn enrich_with_barcode(rows: &[Row], barcode_rows: &[Row], options: BarcodeOptions) -> Rows {
    enrich_with_barcode_stats(rows, barcode_rows, options).0
}

/// Barcode enrichment that also reports how each row was matched.
///
/// Unmatched rows come back unchanged. Empty inputs on either side skip the
/// pass entirely.
pub fn enrich_with_barcode_stats(
    rows: &[Row],
    barcode_rows: &[Row],
    options: BarcodeOptions,
) -> (Rows, BarcodeStats) {
    let mut stats = BarcodeStats::default();
    if rows.is_empty() || barcode_rows.is_empty() {
        stats.unmatched = rows.len();
        return (rows.to_vec(), stats);
    }

    let index = BarcodeIndex::build(barcode_rows);
    let enriched = rows
        .iter()
        .map(|row| {
            let mut next = row.clone();
            match index.lookup(row, options) {
                Some((barcode, tier)) => {
                    next.insert(BARCODE.to_string(), barcode.clone());
                    stats.record(tier);
                }
                None => stats.record(BarcodeMatch::Unmatched),
            }
            next
        })
        .collect();

    debug!(
        rows = rows.len(),
        barcode_rows = barcode_rows.len(),
        matched = stats.matched(),
        "Barcode enrichment finished"
    );
    (enriched, stats)
}
