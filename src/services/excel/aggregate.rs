use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

use super::types::{ChartSuggestion, ChartType, Row};
use super::utils::{cell_number, coerce_numeric, parse_date_string};

const MAX_GROUPS: usize = 15;
const SCATTER_POINT_LIMIT: usize = 500;

/// Produces the plot-ready records for one selected suggestion. Pure and
/// recomputed per call; an empty row set yields an empty series, and missing
/// axis fields degrade to empty-string column lookups rather than erroring.
pub fn aggregate_chart_data(suggestion: &ChartSuggestion, raw_data: &[Row]) -> Vec<Value> {
    if raw_data.is_empty() {
        return Vec::new();
    }

    match suggestion.chart_type {
        ChartType::Bar | ChartType::Pie => grouped_sums(suggestion, raw_data),
        ChartType::Line | ChartType::Area => time_series(suggestion, raw_data),
        ChartType::Scatter => scatter_points(suggestion, raw_data),
    }
}

fn group_column(suggestion: &ChartSuggestion) -> &str {
    suggestion
        .category_column
        .as_deref()
        .or(suggestion.x_axis_column.as_deref())
        .unwrap_or("")
}

fn y_column(suggestion: &ChartSuggestion) -> &str {
    suggestion.y_axis_column.as_deref().unwrap_or("")
}

/// Bar/pie: sum the y column per group, largest groups first, capped at 15.
fn grouped_sums(suggestion: &ChartSuggestion, raw_data: &[Row]) -> Vec<Value> {
    let key_column = group_column(suggestion);
    let value_column = y_column(suggestion);

    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, f64> = HashMap::new();

    for row in raw_data {
        let key = row
            .get(key_column)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let amount = row.get(value_column).map(coerce_numeric).unwrap_or(0.0);
        if !sums.contains_key(&key) {
            order.push(key.clone());
        }
        *sums.entry(key).or_insert(0.0) += amount;
    }

    let mut groups: Vec<(String, f64)> = order
        .into_iter()
        .map(|key| {
            let sum = sums[&key];
            (key, sum)
        })
        .collect();
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    groups.truncate(MAX_GROUPS);

    groups
        .into_iter()
        .map(|(name, sum)| json!({ "name": name, "value": sum.round() as i64 }))
        .collect()
}

/// Line/area: average the y column per date group, ordered by parsed date
/// ascending. The record carries the y column's own name as a key, so these
/// are built as raw JSON objects.
fn time_series(suggestion: &ChartSuggestion, raw_data: &[Row]) -> Vec<Value> {
    let date_column = suggestion.x_axis_column.as_deref().unwrap_or("");
    let value_column = y_column(suggestion);

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (f64, u64)> = HashMap::new();

    for row in raw_data {
        let key = row
            .get(date_column)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let amount = row.get(value_column).map(coerce_numeric).unwrap_or(0.0);
        if !totals.contains_key(&key) {
            order.push(key.clone());
        }
        let entry = totals.entry(key).or_insert((0.0, 0));
        entry.0 += amount;
        entry.1 += 1;
    }

    let mut points: Vec<(String, f64, u64)> = order
        .into_iter()
        .map(|key| {
            let (sum, count) = totals[&key];
            (key, sum, count)
        })
        .collect();

    // unparseable keys sort first, then lexically, so a malformed date
    // cannot panic the ordering
    points.sort_by(|a, b| match (parse_date_string(&a.0), parse_date_string(&b.0)) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.0.cmp(&b.0),
    });

    points
        .into_iter()
        .map(|(date, sum, count)| {
            let average = (sum / count as f64).round() as i64;
            let mut record = Map::new();
            record.insert("date".to_string(), Value::String(date));
            record.insert(value_column.to_string(), json!(average));
            record.insert("total".to_string(), json!(sum.round() as i64));
            record.insert("average".to_string(), json!(average));
            Value::Object(record)
        })
        .collect()
}

/// Scatter: first 500 rows mapped to coordinate pairs; rows where either
/// axis has no numeric reading are dropped.
fn scatter_points(suggestion: &ChartSuggestion, raw_data: &[Row]) -> Vec<Value> {
    let x_column = suggestion.x_axis_column.as_deref().unwrap_or("");
    let y_axis = y_column(suggestion);

    raw_data
        .iter()
        .take(SCATTER_POINT_LIMIT)
        .enumerate()
        .filter_map(|(idx, row)| {
            let x = row.get(x_column).and_then(cell_number)?;
            let y = row.get(y_axis).and_then(cell_number)?;
            Some(json!({ "x": x, "y": y, "name": format!("Row {}", idx + 1) }))
        })
        .collect()
}
