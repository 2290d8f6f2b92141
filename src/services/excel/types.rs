use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

pub const SAMPLE_SIZE: usize = 5;

/// One spreadsheet cell after parsing. Numeric-looking strings stay `Text`
/// so the classifier can see their original form; dates are normalized to an
/// ISO `YYYY-MM-DD` string at ingestion time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Text(String),
    Number(f64),
    Date(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Equality key for unique-value counting. Tagged per variant so a
    /// numeric 100 and the string "100" never collapse into one value.
    pub fn key(&self) -> String {
        match self {
            CellValue::Null => "null:".to_string(),
            CellValue::Text(s) => format!("text:{}", s),
            CellValue::Number(n) => format!("number:{}", n),
            CellValue::Date(s) => format!("date:{}", s),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Text(s) | CellValue::Date(s) => f.write_str(s),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
        }
    }
}

/// Raw worksheet contents: first row supplies the headers.
pub type RawGrid = Vec<Vec<CellValue>>;

/// One cleaned data row keyed by column name.
pub type Row = HashMap<String, CellValue>;

/// Ingested dataset. `columns` keeps the worksheet's left-to-right order;
/// rows are keyed maps so downstream stages never index by position.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Date,
    Text,
    Currency,
    Percentage,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Text => "text",
            ColumnType::Currency => "currency",
            ColumnType::Percentage => "percentage",
        };
        f.write_str(name)
    }
}

/// Which classifier stage produced the final type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeSource {
    Pattern,
    NameFallback,
}

impl fmt::Display for TypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSource::Pattern => f.write_str("pattern"),
            TypeSource::NameFallback => f.write_str("name-fallback"),
        }
    }
}

/// Inferred semantic type plus stats for one column. Computed once per
/// ingested dataset from the classification sample, never mutated after.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    pub unique_value_count: usize,
    pub null_count: usize,
    pub sample_values: SmallVec<[CellValue; SAMPLE_SIZE]>,
    pub confidence: f64,
    pub source: TypeSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Scatter,
    Area,
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Scatter => "scatter",
            ChartType::Area => "area",
        };
        f.write_str(name)
    }
}

/// A recommended chart configuration with its 0-100 confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSuggestion {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub title: String,
    pub description: String,
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_column: Option<String>,
}

/// Everything derived from one uploaded workbook. Replaced wholesale on the
/// next upload, discarded entirely on any ingestion failure.
#[derive(Debug, Clone)]
pub struct ActiveAnalysis {
    pub file_name: String,
    pub sheet_names: Vec<String>,
    pub dataset: Dataset,
    pub profiles: Vec<ColumnProfile>,
    pub suggestions: Vec<ChartSuggestion>,
}
