use std::collections::HashMap;

use tracing::debug;

use crate::constants::{
    COLOR_CODE, COLOR_DESCRIPTION, ENTRIES_COLUMN_ORDER, ENTRIES_DATE_COLUMNS,
    ENTRIES_PRODUCT_ATTRIBUTES, FORMATTED_SUFFIX, PRODUCT, PRODUCT_COLOR, PRODUCT_COLOR_DESCRIPTION,
};
use crate::pipeline::processing::color::{normalize, ColorResolver};
use crate::pipeline::processing::transform::{convert_dates_with, project_ordered, value_as_key};
use crate::types::{Row, Rows};

use super::{merge_attributes, PipelineSettings, ProductLookup};

/// Stock entries report.
///
/// Rows without a product code are discarded. The rest gain product
/// attributes and a resolved color description, and are projected onto a
/// fixed column order.
pub fn process_entries(
    entries: &[Row],
    products: &[Row],
    colors: &[Row],
    settings: &PipelineSettings,
) -> Rows {
    if entries.is_empty() {
        return Vec::new();
    }

    let lookup = ProductLookup::build(products);
    let color_descriptions = database_colors(colors);
    let resolver = &settings.color_resolver;

    let enriched: Rows = entries
        .iter()
        .filter(|row| row.get(PRODUCT).map(|v| !v.is_null()).unwrap_or(false))
        .map(|row| {
            let mut next = row.clone();
            if let Some(product) = lookup.get(row) {
                merge_attributes(&mut next, product, ENTRIES_PRODUCT_ATTRIBUTES);
            }
            if let Some(description) = color_description(row, &color_descriptions, resolver) {
                next.insert(PRODUCT_COLOR_DESCRIPTION.to_string(), description.into());
            }
            next
        })
        .collect();

    debug!(
        input = entries.len(),
        kept = enriched.len(),
        "Dropped stock entries without product"
    );

    let converted = convert_dates_with(&enriched, ENTRIES_DATE_COLUMNS, settings.date_precision);
    let order = output_columns();
    converted.iter().map(|row| project_ordered(row, &order)).collect()
}

/// Basic colors table keyed by normalized color code; later rows win.
fn database_colors(colors: &[Row]) -> HashMap<String, String> {
    colors
        .iter()
        .filter_map(|row| {
            let code = normalize(row.get(COLOR_CODE).map(value_as_key).as_deref());
            if code.is_empty() {
                return None;
            }
            let description = row.get(COLOR_DESCRIPTION).map(value_as_key).unwrap_or_default();
            Some((code, description))
        })
        .collect()
}

fn color_description(
    row: &Row,
    database: &HashMap<String, String>,
    resolver: &ColorResolver,
) -> Option<String> {
    let code = row.get(PRODUCT_COLOR).map(value_as_key);
    let fallback = code
        .as_deref()
        .and_then(|c| database.get(&normalize(Some(c))))
        .map(String::as_str);
    let resolved = resolver.resolve(code.as_deref(), fallback);
    (!resolved.is_empty()).then_some(resolved)
}

/// Fixed column order with each date column followed by its display twin
fn output_columns() -> Vec<String> {
    let mut columns = Vec::with_capacity(ENTRIES_COLUMN_ORDER.len() + ENTRIES_DATE_COLUMNS.len());
    for &column in ENTRIES_COLUMN_ORDER {
        columns.push(column.to_string());
        if ENTRIES_DATE_COLUMNS.contains(&column) {
            columns.push(format!("{}{}", column, FORMATTED_SUFFIX));
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::color::ColorMapping;
    use serde_json::{json, Value};

    fn rows(value: Value) -> Rows {
        value.as_array().unwrap().iter().map(|v| v.as_object().cloned().unwrap()).collect()
    }

    #[test]
    fn test_entries_with_null_product_are_dropped() {
        let entries = rows(json!([
            {"PRODUTO": null, "FILIAL": "CD"},
            {"FILIAL": "CD"},
            {"PRODUTO": "A1", "FILIAL": "CD"}
        ]));

        let result = process_entries(&entries, &[], &[], &PipelineSettings::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["PRODUTO"], json!("A1"));
    }

    #[test]
    fn test_entries_enriched_and_ordered() {
        let entries = rows(json!([{
            "QTDE_TOTAL": 12,
            "COR_PRODUTO": "02",
            "PRODUTO": "a1",
            "ROMANEIO_PRODUTO": "R-77",
            "FILIAL": "LOJA CENTRO",
            "EMISSAO": "2024-08-15 10:00:00",
            "OBS_INTERNA": "dropped by projection"
        }]));
        let products = rows(json!([{
            "PRODUTO": "A1",
            "DESC_PRODUTO": "Lenço Seda",
            "GRUPO_PRODUTO": "ACESSORIOS",
            "LINHA": "PREMIUM",
            "GRIFFE": "not copied"
        }]));
        let colors = rows(json!([{"COR": "02", "DESC_COR": " azul "}]));

        let result = process_entries(&entries, &products, &colors, &PipelineSettings::default());
        let row = &result[0];
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            vec![
                "EMISSAO",
                "EMISSAO_FORMATADO",
                "FILIAL",
                "ROMANEIO_PRODUTO",
                "PRODUTO",
                "DESC_PRODUTO",
                "COR_PRODUTO",
                "DESC_COR_PRODUTO",
                "QTDE_TOTAL",
                "GRUPO_PRODUTO",
                "LINHA"
            ]
        );
        assert_eq!(row["DESC_COR_PRODUTO"], json!("AZUL"));
        assert_eq!(row["EMISSAO_FORMATADO"], json!("15/08/2024"));
        assert_eq!(row["DESC_PRODUTO"], json!("Lenço Seda"));
    }

    #[test]
    fn test_entries_fixed_color_mapping_wins() {
        let entries = rows(json!([
            {"PRODUTO": "A1", "COR_PRODUTO": "02"},
            {"PRODUTO": "A1", "COR_PRODUTO": "99"}
        ]));
        let colors = rows(json!([{"COR": "02", "DESC_COR": "AZUL"}]));
        let settings = PipelineSettings {
            color_resolver: ColorResolver::new(ColorMapping::new([("02", "azul marinho")])),
            ..PipelineSettings::default()
        };

        let result = process_entries(&entries, &[], &colors, &settings);
        assert_eq!(result[0]["DESC_COR_PRODUTO"], json!("AZUL MARINHO"));
        // no mapping and no database color: field stays absent
        assert!(!result[1].contains_key("DESC_COR_PRODUTO"));
    }

    #[test]
    fn test_entries_empty() {
        assert!(process_entries(&[], &[], &[], &PipelineSettings::default()).is_empty());
    }
}
