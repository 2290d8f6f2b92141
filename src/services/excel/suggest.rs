use super::classify::TYPE_DETECTION_ROWS;
use super::types::{ChartSuggestion, ChartType, ColumnProfile, ColumnType, Row};

const BAR_CAP: u8 = 95;
const LINE_CAP: u8 = 90;
const PIE_CAP: u8 = 85;
const SCATTER_CAP: u8 = 80;
const AREA_CAP: u8 = 75;

/// Categorical columns with more distinct values than this fraction of the
/// sample are treated as free text and excluded from grouping.
const CATEGORICAL_MAX_RATIO: f64 = 0.7;
const PIE_PREFERRED_CARDINALITY: usize = 8;
const PIE_MAX_CARDINALITY: usize = 10;

/// Builds the ranked suggestion list from the classified columns. Every
/// rule is gated independently; an empty bucket suppresses its rule rather
/// than failing. Result is sorted by confidence descending, ties keeping
/// generation order (bar, line, pie, scatter, area).
pub fn generate_suggestions(profiles: &[ColumnProfile], rows: &[Row]) -> Vec<ChartSuggestion> {
    let sample_len = rows.len().min(TYPE_DETECTION_ROWS);

    let numeric_like: Vec<&ColumnProfile> = profiles
        .iter()
        .filter(|p| {
            matches!(
                p.column_type,
                ColumnType::Number | ColumnType::Currency | ColumnType::Percentage
            )
        })
        .collect();
    let categorical: Vec<&ColumnProfile> = profiles
        .iter()
        .filter(|p| {
            p.column_type == ColumnType::Text
                && p.unique_value_count > 1
                && (p.unique_value_count as f64) < CATEGORICAL_MAX_RATIO * sample_len as f64
        })
        .collect();
    let temporal: Vec<&ColumnProfile> = profiles
        .iter()
        .filter(|p| p.column_type == ColumnType::Date)
        .collect();

    let mut suggestions = Vec::new();

    if let (Some(category), Some(numeric)) = (categorical.first(), numeric_like.first()) {
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::Bar,
            title: format!("{} by {}", numeric.name, category.name),
            description: format!("Compare total {} across each {}", numeric.name, category.name),
            confidence: scaled_confidence(category.confidence, numeric.confidence, 50.0, BAR_CAP),
            x_axis_column: Some(category.name.clone()),
            y_axis_column: Some(numeric.name.clone()),
            category_column: None,
        });
    }

    if let (Some(date), Some(numeric)) = (temporal.first(), numeric_like.first()) {
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::Line,
            title: format!("{} over time", numeric.name),
            description: format!("Track how {} evolves along {}", numeric.name, date.name),
            confidence: scaled_confidence(date.confidence, numeric.confidence, 45.0, LINE_CAP),
            x_axis_column: Some(date.name.clone()),
            y_axis_column: Some(numeric.name.clone()),
            category_column: None,
        });
    }

    if let Some(numeric) = numeric_like.first() {
        let pie_category = categorical
            .iter()
            .find(|p| p.unique_value_count <= PIE_PREFERRED_CARDINALITY)
            .or_else(|| categorical.first());
        if let Some(category) = pie_category {
            if category.unique_value_count <= PIE_MAX_CARDINALITY {
                suggestions.push(ChartSuggestion {
                    chart_type: ChartType::Pie,
                    title: format!("Distribution of {}", numeric.name),
                    description: format!("Share of {} per {}", numeric.name, category.name),
                    confidence: scaled_confidence(
                        category.confidence,
                        numeric.confidence,
                        42.0,
                        PIE_CAP,
                    ),
                    x_axis_column: None,
                    y_axis_column: Some(numeric.name.clone()),
                    category_column: Some(category.name.clone()),
                });
            }
        }
    }

    if numeric_like.len() >= 2 {
        let (first, second) = (numeric_like[0], numeric_like[1]);
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::Scatter,
            title: format!("{} vs {}", first.name, second.name),
            description: format!("Relationship between {} and {}", first.name, second.name),
            confidence: scaled_confidence(first.confidence, second.confidence, 40.0, SCATTER_CAP),
            x_axis_column: Some(first.name.clone()),
            y_axis_column: Some(second.name.clone()),
            category_column: None,
        });
    }

    if let Some(date) = temporal.first() {
        if numeric_like.len() >= 2 {
            let numeric = numeric_like[0];
            suggestions.push(ChartSuggestion {
                chart_type: ChartType::Area,
                title: format!("Cumulative view of {}", numeric.name),
                description: format!("Filled trend of {} along {}", numeric.name, date.name),
                confidence: scaled_confidence(date.confidence, numeric.confidence, 37.0, AREA_CAP),
                x_axis_column: Some(date.name.clone()),
                y_axis_column: Some(numeric.name.clone()),
                category_column: None,
            });
        }
    }

    // stable sort: ties keep generation order
    suggestions.sort_by(|a, b| b.confidence.cmp(&a.confidence));

    tracing::debug!("Generated {} chart suggestions", suggestions.len());
    suggestions
}

fn scaled_confidence(a: f64, b: f64, factor: f64, cap: u8) -> u8 {
    (((a + b) * factor).round() as u8).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::excel::types::TypeSource;
    use smallvec::SmallVec;

    fn profile(name: &str, column_type: ColumnType, unique: usize, confidence: f64) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            column_type,
            unique_value_count: unique,
            null_count: 0,
            sample_values: SmallVec::new(),
            confidence,
            source: TypeSource::Pattern,
        }
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|_| Row::new()).collect()
    }

    fn of_type(suggestions: &[ChartSuggestion], chart_type: ChartType) -> Option<&ChartSuggestion> {
        suggestions.iter().find(|s| s.chart_type == chart_type)
    }

    #[test]
    fn category_plus_numeric_yields_bar_and_pie() {
        let profiles = vec![
            profile("Region", ColumnType::Text, 2, 1.0),
            profile("Sales", ColumnType::Number, 3, 1.0),
        ];
        let suggestions = generate_suggestions(&profiles, &rows(3));

        let bar = of_type(&suggestions, ChartType::Bar).unwrap();
        assert_eq!(bar.x_axis_column.as_deref(), Some("Region"));
        assert_eq!(bar.y_axis_column.as_deref(), Some("Sales"));
        assert_eq!(bar.confidence, 95);

        let pie = of_type(&suggestions, ChartType::Pie).unwrap();
        assert_eq!(pie.category_column.as_deref(), Some("Region"));
        assert_eq!(pie.confidence, 84);

        assert!(of_type(&suggestions, ChartType::Line).is_none());
        assert!(of_type(&suggestions, ChartType::Scatter).is_none());
        assert!(of_type(&suggestions, ChartType::Area).is_none());
    }

    #[test]
    fn two_numeric_columns_alone_yield_only_scatter() {
        let profiles = vec![
            profile("Width", ColumnType::Number, 4, 1.0),
            profile("Height", ColumnType::Number, 4, 1.0),
        ];
        let suggestions = generate_suggestions(&profiles, &rows(4));
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].chart_type, ChartType::Scatter);
        assert_eq!(suggestions[0].confidence, 80);
        assert_eq!(suggestions[0].x_axis_column.as_deref(), Some("Width"));
        assert_eq!(suggestions[0].y_axis_column.as_deref(), Some("Height"));
    }

    #[test]
    fn confidences_stay_under_rule_caps() {
        let profiles = vec![
            profile("Fecha", ColumnType::Date, 10, 1.0),
            profile("Region", ColumnType::Text, 3, 1.0),
            profile("Ventas", ColumnType::Currency, 10, 1.0),
            profile("Unidades", ColumnType::Number, 10, 1.0),
        ];
        let suggestions = generate_suggestions(&profiles, &rows(20));
        assert_eq!(of_type(&suggestions, ChartType::Bar).unwrap().confidence, 95);
        assert_eq!(of_type(&suggestions, ChartType::Line).unwrap().confidence, 90);
        assert_eq!(of_type(&suggestions, ChartType::Pie).unwrap().confidence, 84);
        assert_eq!(of_type(&suggestions, ChartType::Scatter).unwrap().confidence, 80);
        assert_eq!(of_type(&suggestions, ChartType::Area).unwrap().confidence, 74);
    }

    #[test]
    fn suggestions_are_sorted_by_confidence_descending() {
        let profiles = vec![
            profile("Fecha", ColumnType::Date, 10, 1.0),
            profile("Region", ColumnType::Text, 3, 1.0),
            profile("Ventas", ColumnType::Currency, 10, 1.0),
            profile("Unidades", ColumnType::Number, 10, 1.0),
        ];
        let suggestions = generate_suggestions(&profiles, &rows(20));
        let confidences: Vec<u8> = suggestions.iter().map(|s| s.confidence).collect();
        let mut sorted = confidences.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(confidences, sorted);
    }

    #[test]
    fn near_unique_text_is_not_categorical() {
        // 18 distinct values over a 20-row sample exceeds the 0.7 ratio
        let profiles = vec![
            profile("Comment", ColumnType::Text, 18, 1.0),
            profile("Sales", ColumnType::Number, 10, 1.0),
        ];
        let suggestions = generate_suggestions(&profiles, &rows(20));
        assert!(of_type(&suggestions, ChartType::Bar).is_none());
        assert!(of_type(&suggestions, ChartType::Pie).is_none());
    }

    #[test]
    fn constant_text_is_not_categorical() {
        let profiles = vec![
            profile("Status", ColumnType::Text, 1, 1.0),
            profile("Sales", ColumnType::Number, 10, 1.0),
        ];
        let suggestions = generate_suggestions(&profiles, &rows(20));
        assert!(of_type(&suggestions, ChartType::Bar).is_none());
    }

    #[test]
    fn pie_is_suppressed_above_ten_groups() {
        let profiles = vec![
            profile("City", ColumnType::Text, 12, 1.0),
            profile("Sales", ColumnType::Number, 10, 1.0),
        ];
        let suggestions = generate_suggestions(&profiles, &rows(20));
        assert!(of_type(&suggestions, ChartType::Bar).is_some());
        assert!(of_type(&suggestions, ChartType::Pie).is_none());
    }

    #[test]
    fn pie_prefers_the_first_low_cardinality_categorical() {
        let profiles = vec![
            profile("City", ColumnType::Text, 9, 1.0),
            profile("Country", ColumnType::Text, 4, 1.0),
            profile("Sales", ColumnType::Number, 10, 1.0),
        ];
        let suggestions = generate_suggestions(&profiles, &rows(20));
        // bar keeps the first categorical; pie skips to the first one at or
        // under the preferred cardinality
        assert_eq!(
            of_type(&suggestions, ChartType::Bar).unwrap().x_axis_column.as_deref(),
            Some("City")
        );
        assert_eq!(
            of_type(&suggestions, ChartType::Pie).unwrap().category_column.as_deref(),
            Some("Country")
        );
    }

    #[test]
    fn area_requires_two_numeric_columns() {
        let profiles = vec![
            profile("Fecha", ColumnType::Date, 5, 1.0),
            profile("Sales", ColumnType::Number, 10, 1.0),
        ];
        let suggestions = generate_suggestions(&profiles, &rows(10));
        assert!(of_type(&suggestions, ChartType::Line).is_some());
        assert!(of_type(&suggestions, ChartType::Area).is_none());
    }

    #[test]
    fn no_profiles_means_no_suggestions() {
        assert!(generate_suggestions(&[], &rows(5)).is_empty());
    }
}
