use std::collections::HashSet;

use tracing::debug;

use crate::constants::{ECOMMERCE_DATE_COLUMNS, INVOICE_ITEM, INVOICE_NUMBER, INVOICE_SERIES};
use crate::pipeline::processing::transform::{convert_dates_with, value_as_key};
use crate::types::{Row, Rows};

use super::PipelineSettings;

/// E-commerce report: date conversion, optionally one row per invoice item.
pub fn process_ecommerce(ecommerce: &[Row], settings: &PipelineSettings) -> Rows {
    let converted = convert_dates_with(ecommerce, ECOMMERCE_DATE_COLUMNS, settings.date_precision);
    if !settings.dedupe_ecommerce_items {
        return converted;
    }

    let before = converted.len();
    let mut seen = HashSet::with_capacity(before);
    let deduped: Rows = converted
        .into_iter()
        .filter(|row| seen.insert(invoice_item_key(row)))
        .collect();
    debug!(before, after = deduped.len(), "Removed duplicate invoice items");
    deduped
}

fn invoice_item_key(row: &Row) -> String {
    [INVOICE_NUMBER, INVOICE_SERIES, INVOICE_ITEM]
        .iter()
        .map(|column| row.get(*column).map(value_as_key).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rows(value: Value) -> Rows {
        value.as_array().unwrap().iter().map(|v| v.as_object().cloned().unwrap()).collect()
    }

    fn sample() -> Rows {
        rows(json!([
            {"NF_SAIDA": "1001", "SERIE_NF": "1", "ITEM": 1, "EMISSAO": "2024-07-01", "VALOR": 10},
            {"NF_SAIDA": "1001", "SERIE_NF": "1", "ITEM": 1, "EMISSAO": "2024-07-01", "VALOR": 99},
            {"NF_SAIDA": "1001", "SERIE_NF": "1", "ITEM": 2, "ENTREGA": "garbage"}
        ]))
    }

    #[test]
    fn test_process_ecommerce_converts_dates_only() {
        let result = process_ecommerce(&sample(), &PipelineSettings::default());

        assert_eq!(result.len(), 3);
        assert_eq!(result[0]["EMISSAO"], json!("2024-07-01T00:00:00.000Z"));
        assert_eq!(result[0]["EMISSAO_FORMATADO"], json!("01/07/2024"));
        assert_eq!(result[2]["ENTREGA"], Value::Null);
        assert!(!result[2].contains_key("ENTREGA_FORMATADO"));
        assert!(!result[2].contains_key("EMISSAO"));
    }

    #[test]
    fn test_process_ecommerce_dedupe_keeps_first_item() {
        let settings = PipelineSettings {
            dedupe_ecommerce_items: true,
            ..PipelineSettings::default()
        };
        let result = process_ecommerce(&sample(), &settings);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0]["VALOR"], json!(10));
        assert_eq!(result[1]["ITEM"], json!(2));
    }
}
