pub mod aggregate;
pub mod classify;
pub mod ingest;
pub mod suggest;
pub mod types;
pub mod utils;

use thiserror::Error;

/// Ingestion failures. All three abort the current upload; the caller
/// resets every piece of derived state before surfacing them.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("The sheet has no rows")]
    EmptyInput,
    #[error("Not enough usable data rows: found {0}, need at least 2")]
    NoValidData(usize),
    #[error("Failed to parse workbook: {0}")]
    MalformedFile(String),
}

#[cfg(test)]
mod tests {
    use super::types::{CellValue, ChartType, ColumnType, RawGrid};
    use super::{aggregate, classify, ingest, suggest};
    use serde_json::json;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    // ingest -> classify -> suggest -> aggregate over a small sales sheet
    #[test]
    fn region_sales_end_to_end() {
        let grid: RawGrid = vec![
            vec![text("Region"), text("Sales")],
            vec![text("North"), text("100")],
            vec![text("South"), text("200")],
            vec![text("North"), text("150")],
        ];

        let dataset = ingest::ingest_grid(&grid).unwrap();
        assert_eq!(dataset.rows.len(), 3);

        let profiles = classify::classify_columns(&dataset);
        let region = profiles.iter().find(|p| p.name == "Region").unwrap();
        assert_eq!(region.column_type, ColumnType::Text);
        assert_eq!(region.unique_value_count, 2);
        let sales = profiles.iter().find(|p| p.name == "Sales").unwrap();
        assert_eq!(sales.column_type, ColumnType::Number);
        assert_eq!(sales.confidence, 1.0);

        let suggestions = suggest::generate_suggestions(&profiles, &dataset.rows);
        let bar = suggestions
            .iter()
            .find(|s| s.chart_type == ChartType::Bar)
            .unwrap();
        assert_eq!(bar.x_axis_column.as_deref(), Some("Region"));
        assert_eq!(bar.y_axis_column.as_deref(), Some("Sales"));

        let points = aggregate::aggregate_chart_data(bar, &dataset.rows);
        assert_eq!(
            points,
            vec![
                json!({ "name": "North", "value": 250 }),
                json!({ "name": "South", "value": 200 }),
            ]
        );
    }
}
