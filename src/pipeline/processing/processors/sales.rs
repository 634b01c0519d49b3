use std::collections::HashMap;

use crate::constants::{
    BRANCH_CODE, CANCELLED_QUANTITY, EXCHANGE_QUANTITY, EXCHANGE_VALUE, ITEM_EXCHANGE_QUANTITY,
    ITEM_EXCHANGE_VALUE, NET_PRICE, NET_VALUE, QUANTITY, SALES_COLUMNS_TO_DROP, SALES_DATE_COLUMNS,
    SALES_REPORT, SALE_DISCOUNT, SALE_TOTAL, SALE_TOTAL_QUANTITY, TICKET, TICKET_EXCHANGE_QUANTITY,
    TICKET_EXCHANGE_VALUE,
};
use crate::pipeline::processing::barcode::{enrich_with_barcode_stats, BarcodeOptions};
use crate::pipeline::processing::transform::{
    column_number, convert_dates_with, drop_columns, move_to_front, number_value, value_as_key,
};
use crate::types::{Row, Rows};

use super::{record_barcode_stats, PipelineSettings};

const EXCHANGE_COLUMNS: &[&str] = &[
    ITEM_EXCHANGE_QUANTITY,
    ITEM_EXCHANGE_VALUE,
    TICKET_EXCHANGE_QUANTITY,
    TICKET_EXCHANGE_VALUE,
];

/// Sales report.
///
/// Only lines with a positive quantity are kept. Barcodes are matched while
/// TAMANHO is still present. Net value and net quantity discount cancelled
/// lines and exchanges; exchanges recorded per ticket are spread across the
/// ticket's lines in proportion to each line's sale total.
pub fn process_sales(sales: &[Row], barcodes: &[Row], settings: &PipelineSettings) -> Rows {
    let filtered: Rows = sales
        .iter()
        .filter(|row| column_number(row, QUANTITY) > 0.0)
        .cloned()
        .collect();

    let converted = convert_dates_with(&filtered, SALES_DATE_COLUMNS, settings.date_precision);
    let (enriched, stats) = enrich_with_barcode_stats(
        &converted,
        barcodes,
        BarcodeOptions { prioritize_size: true },
    );
    record_barcode_stats(SALES_REPORT, &stats);

    let with_totals: Rows = enriched.iter().map(with_sale_totals).collect();
    let allocated = allocate_exchanges(&with_totals);
    let trimmed = drop_columns(&allocated, SALES_COLUMNS_TO_DROP);

    trimmed
        .iter()
        .map(|row| {
            if row.contains_key(QUANTITY) && row.contains_key(NET_VALUE) {
                move_to_front(row, &[QUANTITY, NET_VALUE])
            } else {
                row.clone()
            }
        })
        .collect()
}

/// Sale value of a line before exchanges: zero when any quantity was
/// cancelled, otherwise `PRECO_LIQUIDO × QTDE − DESCONTO_VENDA`.
pub fn net_sale_value(row: &Row) -> f64 {
    if is_cancelled(row) {
        return 0.0;
    }
    column_number(row, NET_PRICE) * column_number(row, QUANTITY) - column_number(row, SALE_DISCOUNT)
}

fn is_cancelled(row: &Row) -> bool {
    column_number(row, CANCELLED_QUANTITY) > 0.0
}

fn net_sale_quantity(row: &Row) -> f64 {
    if is_cancelled(row) {
        return 0.0;
    }
    column_number(row, QUANTITY)
}

fn with_sale_totals(row: &Row) -> Row {
    let mut next = row.clone();
    next.insert(SALE_TOTAL.to_string(), number_value(net_sale_value(row)));
    next.insert(SALE_TOTAL_QUANTITY.to_string(), number_value(net_sale_quantity(row)));
    for &column in EXCHANGE_COLUMNS {
        next.insert(column.to_string(), number_value(column_number(row, column)));
    }
    next
}

fn ticket_key(row: &Row) -> String {
    let ticket = row.get(TICKET).map(value_as_key).unwrap_or_default();
    let branch = row.get(BRANCH_CODE).map(value_as_key).unwrap_or_default();
    format!("{}|{}", ticket, branch)
}

/// Charge exchanges against each line and derive VALOR_LIQUIDO and the net
/// QTDE. Item-level exchanges take precedence over the ticket-level share.
/// Cancelled lines take no exchange, so they stay at zero.
fn allocate_exchanges(rows: &[Row]) -> Rows {
    let mut ticket_totals: HashMap<String, f64> = HashMap::new();
    for row in rows {
        *ticket_totals.entry(ticket_key(row)).or_insert(0.0) += column_number(row, SALE_TOTAL);
    }

    rows.iter()
        .map(|row| {
            let ticket_total = ticket_totals.get(&ticket_key(row)).copied().unwrap_or(0.0);
            let sale_total = column_number(row, SALE_TOTAL);
            let share = if ticket_total > 0.0 { sale_total / ticket_total } else { 0.0 };

            let (exchange_quantity, exchange_value) = if is_cancelled(row) {
                (0.0, 0.0)
            } else {
                (
                    exchange_amount(row, ITEM_EXCHANGE_QUANTITY, TICKET_EXCHANGE_QUANTITY, share),
                    exchange_amount(row, ITEM_EXCHANGE_VALUE, TICKET_EXCHANGE_VALUE, share),
                )
            };

            let mut next = row.clone();
            next.insert(EXCHANGE_QUANTITY.to_string(), number_value(exchange_quantity));
            next.insert(EXCHANGE_VALUE.to_string(), number_value(exchange_value));
            next.insert(NET_VALUE.to_string(), number_value(sale_total - exchange_value));
            next.insert(
                QUANTITY.to_string(),
                number_value(column_number(row, SALE_TOTAL_QUANTITY) - exchange_quantity),
            );
            next
        })
        .collect()
}

fn exchange_amount(row: &Row, item_column: &str, ticket_column: &str, share: f64) -> f64 {
    let item = column_number(row, item_column);
    if item > 0.0 {
        item
    } else {
        column_number(row, ticket_column) * share
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rows(value: Value) -> Rows {
        value.as_array().unwrap().iter().map(|v| v.as_object().cloned().unwrap()).collect()
    }

    fn as_f64(value: &Value) -> f64 {
        value.as_f64().unwrap()
    }

    #[test]
    fn test_net_value_of_plain_sale() {
        let sales = rows(json!([{
            "QTDE_CANCELADA": 0,
            "PRECO_LIQUIDO": 100,
            "QTDE": 2,
            "DESCONTO_VENDA": 10
        }]));

        let result = process_sales(&sales, &[], &PipelineSettings::default());
        assert_eq!(result[0]["VALOR_LIQUIDO"], json!(190));
        assert_eq!(result[0]["QTDE"], json!(2));
    }

    #[test]
    fn test_cancelled_line_has_zero_net_value() {
        let row = rows(json!([{"QTDE_CANCELADA": 1, "PRECO_LIQUIDO": 100, "QTDE": 2, "DESCONTO_VENDA": 10}]))
            .remove(0);
        assert_eq!(net_sale_value(&row), 0.0);

        let result = process_sales(&[row], &[], &PipelineSettings::default());
        assert_eq!(result[0]["VALOR_LIQUIDO"], json!(0));
        assert_eq!(result[0]["QTDE"], json!(0));
    }

    #[test]
    fn test_cancelled_line_ignores_exchanges() {
        let sales = rows(json!([
            {"TICKET": "T5", "CODIGO_FILIAL": "001", "QTDE": 1, "QTDE_CANCELADA": 1, "PRECO_LIQUIDO": 100,
             "QTDE_TROCA_ITEM": 1, "VALOR_TROCA_ITEM": 100},
            {"TICKET": "T6", "CODIGO_FILIAL": "001", "QTDE": 1, "QTDE_CANCELADA": 1, "PRECO_LIQUIDO": 100,
             "QTDE_TROCA_TICKET": 1, "VALOR_TROCA_TICKET": 100}
        ]));

        let result = process_sales(&sales, &[], &PipelineSettings::default());
        for row in &result {
            assert_eq!(row["VALOR_LIQUIDO"], json!(0));
            assert_eq!(row["QTDE"], json!(0));
            assert_eq!(row["VALOR_TROCA"], json!(0));
            assert_eq!(row["QTDE_TROCA"], json!(0));
        }
    }

    #[test]
    fn test_net_sale_value_matches_formula() {
        let row = rows(json!([{"PRECO_LIQUIDO": "39.90", "QTDE": 3, "DESCONTO_VENDA": null}])).remove(0);
        assert!((net_sale_value(&row) - 119.7).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_quantities_are_dropped() {
        let sales = rows(json!([
            {"PRODUTO": "A", "QTDE": 0},
            {"PRODUTO": "B", "QTDE": -1},
            {"PRODUTO": "C", "QTDE": "x"},
            {"PRODUTO": "D", "QTDE": 1}
        ]));
        let result = process_sales(&sales, &[], &PipelineSettings::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["PRODUTO"], json!("D"));
    }

    #[test]
    fn test_quantity_and_net_value_move_to_front_and_technical_columns_drop() {
        let sales = rows(json!([{
            "FILIAL": "LOJA 1",
            "DATA_VENDA": "2024-12-02",
            "PRODUTO": "A1",
            "COR_PRODUTO": "01",
            "TAMANHO": "M",
            "PEDIDO": 55,
            "QTDE": 1,
            "QTDE_CANCELADA": 0,
            "PRECO_LIQUIDO": 80,
            "DESCONTO_VENDA": 0,
            "VALOR_TIKET": 80
        }]));
        let barcodes = rows(json!([
            {"PRODUTO": "A1", "COR_PRODUTO": "01", "TAMANHO": "M", "CODIGO_BARRA": "SIZE-M"}
        ]));

        let result = process_sales(&sales, &barcodes, &PipelineSettings::default());
        let row = &result[0];
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();

        assert_eq!(&keys[..2], &["QTDE", "VALOR_LIQUIDO"]);
        for dropped in ["TAMANHO", "PEDIDO", "QTDE_CANCELADA", "VALOR_TIKET"] {
            assert!(!row.contains_key(dropped), "{} should be dropped", dropped);
        }
        assert_eq!(row["CODIGO_BARRA"], json!("SIZE-M"));
        assert_eq!(row["DATA_VENDA_FORMATADO"], json!("02/12/2024"));
        assert_eq!(row["TOTAL_VENDA"], json!(80));
        assert_eq!(row["QTDE_TROCA_ITEM"], json!(0));
    }

    #[test]
    fn test_ticket_exchange_is_spread_by_sale_share() {
        let sales = rows(json!([
            {"TICKET": "T1", "CODIGO_FILIAL": "001", "QTDE": 1, "PRECO_LIQUIDO": 300,
             "QTDE_TROCA_TICKET": 1, "VALOR_TROCA_TICKET": 100},
            {"TICKET": "T1", "CODIGO_FILIAL": "001", "QTDE": 1, "PRECO_LIQUIDO": 100,
             "QTDE_TROCA_TICKET": 1, "VALOR_TROCA_TICKET": 100},
            {"TICKET": "T2", "CODIGO_FILIAL": "001", "QTDE": 2, "PRECO_LIQUIDO": 50}
        ]));

        let result = process_sales(&sales, &[], &PipelineSettings::default());

        assert!((as_f64(&result[0]["VALOR_TROCA"]) - 75.0).abs() < 1e-9);
        assert!((as_f64(&result[0]["VALOR_LIQUIDO"]) - 225.0).abs() < 1e-9);
        assert!((as_f64(&result[0]["QTDE"]) - 0.25).abs() < 1e-9);
        assert!((as_f64(&result[1]["VALOR_TROCA"]) - 25.0).abs() < 1e-9);
        assert!((as_f64(&result[1]["VALOR_LIQUIDO"]) - 75.0).abs() < 1e-9);
        assert_eq!(result[2]["VALOR_LIQUIDO"], json!(100));
        assert_eq!(result[2]["VALOR_TROCA"], json!(0));
    }

    #[test]
    fn test_item_exchange_takes_precedence() {
        let sales = rows(json!([{
            "TICKET": "T9", "CODIGO_FILIAL": "002", "QTDE": 2, "PRECO_LIQUIDO": 50,
            "QTDE_TROCA_ITEM": 1, "VALOR_TROCA_ITEM": 50,
            "QTDE_TROCA_TICKET": 2, "VALOR_TROCA_TICKET": 100
        }]));

        let result = process_sales(&sales, &[], &PipelineSettings::default());
        assert_eq!(result[0]["VALOR_TROCA"], json!(50));
        assert_eq!(result[0]["VALOR_LIQUIDO"], json!(50));
        assert_eq!(result[0]["QTDE"], json!(1));
    }
}
