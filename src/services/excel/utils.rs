use bytes::Bytes;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use reqwest::Client;

use super::types::CellValue;
use crate::error::AppError;

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Tries the common date formats in order; datetime formats are reduced to
/// their date portion.
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS.iter() {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime.date());
        }
    }
    None
}

pub fn is_date_string(s: &str) -> bool {
    parse_date_string(s).is_some()
}

/// Converts an Excel serial day number to an ISO date string. Excel serials
/// count from an 1899-12-30 epoch (the off-by-two covers the phantom
/// 1900-02-29); the time-of-day fraction is discarded.
pub fn excel_serial_to_iso(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch
        .checked_add_signed(Duration::days(serial.floor() as i64))
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Numeric reading of a cell, if it has one. Text is parsed as-is; dates and
/// nulls have none.
pub fn cell_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Aggregation coercion: anything without a numeric reading counts as zero.
pub fn coerce_numeric(value: &CellValue) -> f64 {
    cell_number(value).unwrap_or(0.0)
}

pub async fn load_file_from_url(url: &str) -> Result<Bytes, AppError> {
    let client = Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::FileProcessingError(format!("Failed to fetch file: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::FileProcessingError(format!(
            "Failed to fetch file. Status: {}",
            response.status()
        )));
    }

    response
        .bytes()
        .await
        .map_err(|e| AppError::FileProcessingError(format!("Failed to read response bytes: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_and_slash_dates() {
        assert_eq!(
            parse_date_string("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(
            parse_date_string("15/01/2024"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert!(parse_date_string("not a date").is_none());
    }

    #[test]
    fn datetime_strings_reduce_to_dates() {
        assert_eq!(
            parse_date_string("2024-01-15 10:30:00"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn excel_serials_convert_from_the_1899_epoch() {
        assert_eq!(excel_serial_to_iso(45292.0).as_deref(), Some("2024-01-01"));
        // time-of-day fraction is discarded
        assert_eq!(excel_serial_to_iso(45292.75).as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn numeric_coercion_falls_back_to_zero() {
        assert_eq!(coerce_numeric(&CellValue::Text("12.5".to_string())), 12.5);
        assert_eq!(coerce_numeric(&CellValue::Text("abc".to_string())), 0.0);
        assert_eq!(coerce_numeric(&CellValue::Null), 0.0);
        assert_eq!(
            coerce_numeric(&CellValue::Date("2024-01-01".to_string())),
            0.0
        );
    }

    #[test]
    fn cell_number_rejects_non_numeric_text() {
        assert_eq!(cell_number(&CellValue::Number(3.5)), Some(3.5));
        assert_eq!(cell_number(&CellValue::Text(" 42 ".to_string())), Some(42.0));
        assert_eq!(cell_number(&CellValue::Text("n/a".to_string())), None);
    }
}
