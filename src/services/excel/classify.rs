use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use smallvec::SmallVec;
use std::collections::HashSet;

use super::types::{CellValue, ColumnProfile, ColumnType, Dataset, Row, TypeSource, SAMPLE_SIZE};
use super::utils::is_date_string;

/// Classification reads at most this many rows regardless of file size.
pub const TYPE_DETECTION_ROWS: usize = 100;

const MAJORITY_THRESHOLD: f64 = 0.6;
const NAME_OVERRIDE_BELOW: f64 = 0.8;
const NAME_FALLBACK_CONFIDENCE: f64 = 0.75;

static CURRENCY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[$€¥£₹]\s*\d[\d,]*(?:\.\d+)?$|^\d[\d,]*(?:\.\d+)?\s*[$€¥£₹]$")
        .expect("currency value pattern")
});
static PERCENT_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)?\s*%$").expect("percentage value pattern"));
static DATE_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{4}[-/]\d{1,2}[-/]\d{1,2}|\d{1,2}[-/]\d{1,2}[-/]\d{4})$")
        .expect("date value pattern")
});

// Pattern-scan name hints: these participate in the per-value scan itself.
static CURRENCY_NAME_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)precio|costo|ingreso|ganancia|monto|valor").expect("hint"));
static PERCENT_NAME_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)porcentaje|rentabilidad|%").expect("hint"));

// Name-fallback keyword groups, checked in this order when pattern-scan
// confidence lands under the override threshold.
static CURRENCY_NAME_FALLBACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)precio|ingreso|costo|ganancia|monto|valor|dinero|pago|factura|venta")
        .expect("fallback")
});
static PERCENT_NAME_FALLBACK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)rentabilidad|porcentaje|%|tasa|ratio|proporcion").expect("fallback"));
static DATE_NAME_FALLBACK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)fecha|date|dia|mes|año|time|cuando").expect("fallback"));
static NUMBER_NAME_FALLBACK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)cantidad|numero|unidades|total|count|id|edad|años").expect("fallback"));

#[derive(Debug, Default)]
struct PatternCounters {
    currency: usize,
    percentage: usize,
    date: usize,
    numeric: usize,
}

/// Profiles every column over the first min(100, rowCount) rows. Output
/// order matches the dataset's column order.
pub fn classify_columns(dataset: &Dataset) -> Vec<ColumnProfile> {
    let sample_len = dataset.rows.len().min(TYPE_DETECTION_ROWS);
    let sample = &dataset.rows[..sample_len];

    dataset
        .columns
        .par_iter()
        .map(|name| classify_column(name, sample))
        .collect()
}

fn classify_column(name: &str, sample: &[Row]) -> ColumnProfile {
    let mut counters = PatternCounters::default();
    let mut unique = HashSet::new();
    let mut sample_values: SmallVec<[CellValue; SAMPLE_SIZE]> = SmallVec::new();
    let mut non_null = 0usize;

    for row in sample {
        let value = row.get(name).unwrap_or(&CellValue::Null);
        if value.is_null() {
            continue;
        }
        non_null += 1;
        unique.insert(value.key());
        if sample_values.len() < SAMPLE_SIZE {
            sample_values.push(value.clone());
        }
        scan_value(value, name, &mut counters);
    }

    let (column_type, confidence, source) = resolve_type(name, &counters, non_null);

    ColumnProfile {
        name: name.to_string(),
        column_type,
        unique_value_count: unique.len(),
        null_count: sample.len() - non_null,
        sample_values,
        confidence: round2(confidence),
        source,
    }
}

/// Buckets one non-null value into exactly one counter. Precedence per
/// value: currency, then percentage, then date, then number; anything left
/// counts toward text by exclusion.
fn scan_value(value: &CellValue, column_name: &str, counters: &mut PatternCounters) {
    match value {
        CellValue::Number(n) => {
            if CURRENCY_NAME_HINT.is_match(column_name) {
                counters.currency += 1;
            } else if (0.0..=100.0).contains(n) && PERCENT_NAME_HINT.is_match(column_name) {
                counters.percentage += 1;
            } else {
                counters.numeric += 1;
            }
        }
        CellValue::Date(_) => counters.date += 1,
        CellValue::Text(s) => {
            if CURRENCY_VALUE.is_match(s) {
                counters.currency += 1;
            } else if PERCENT_VALUE.is_match(s) {
                counters.percentage += 1;
            } else if DATE_VALUE.is_match(s) || looks_like_slash_date(s) {
                counters.date += 1;
            } else if parses_as_plain_number(s) {
                counters.numeric += 1;
            }
        }
        CellValue::Null => {}
    }
}

fn looks_like_slash_date(s: &str) -> bool {
    let len = s.chars().count();
    (7..=11).contains(&len) && s.contains('/') && is_date_string(s)
}

fn parses_as_plain_number(s: &str) -> bool {
    s.len() < 10
        && !s.contains('/')
        && !s.contains('-')
        && s.parse::<f64>().map(|f| f.is_finite()).unwrap_or(false)
}

fn resolve_type(
    name: &str,
    counters: &PatternCounters,
    non_null: usize,
) -> (ColumnType, f64, TypeSource) {
    let (mut column_type, mut confidence) = majority_type(name, counters, non_null);
    let mut source = TypeSource::Pattern;

    if confidence < NAME_OVERRIDE_BELOW {
        if let Some(hinted) = name_fallback_type(name) {
            let floored = confidence.max(NAME_FALLBACK_CONFIDENCE);
            if hinted != column_type || floored > confidence {
                column_type = hinted;
                confidence = floored;
                source = TypeSource::NameFallback;
            }
        }
    }

    (column_type, confidence, source)
}

fn majority_type(name: &str, counters: &PatternCounters, non_null: usize) -> (ColumnType, f64) {
    if non_null == 0 {
        return (ColumnType::Text, 0.0);
    }

    let total = non_null as f64;
    let ordered = [
        (ColumnType::Currency, counters.currency),
        (ColumnType::Percentage, counters.percentage),
        (ColumnType::Number, counters.numeric),
        (ColumnType::Date, counters.date),
    ];

    let qualifying: Vec<&(ColumnType, usize)> = ordered
        .iter()
        .filter(|(_, count)| *count as f64 / total > MAJORITY_THRESHOLD)
        .collect();

    if qualifying.len() > 1 {
        tracing::warn!(
            column = name,
            "multiple pattern categories exceed the majority threshold; keeping the first by precedence"
        );
    }

    if let Some((column_type, count)) = qualifying.first() {
        (*column_type, *count as f64 / total)
    } else {
        let max = ordered.iter().map(|(_, count)| *count).max().unwrap_or(0);
        (ColumnType::Text, 1.0 - max as f64 / total)
    }
}

fn name_fallback_type(name: &str) -> Option<ColumnType> {
    if CURRENCY_NAME_FALLBACK.is_match(name) {
        Some(ColumnType::Currency)
    } else if PERCENT_NAME_FALLBACK.is_match(name) {
        Some(ColumnType::Percentage)
    } else if DATE_NAME_FALLBACK.is_match(name) {
        Some(ColumnType::Date)
    } else if NUMBER_NAME_FALLBACK.is_match(name) {
        Some(ColumnType::Number)
    } else {
        None
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
