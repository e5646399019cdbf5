use serde::Serialize;

use crate::aggregate::{AggregateTable, CrossTab, StatusAverage};
use crate::labels::{self, Language};
use crate::models::SurveyOption;

/// One chart datum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
    pub percent: f64,
}

pub fn round1(value: f64) -> f64 {
    if value.is_finite() {
        (value * 10.0).round() / 10.0
    } else {
        0.0
    }
}

pub fn to_series(table: &AggregateTable, lang: Language) -> Vec<SeriesPoint> {
    table
        .entries
        .iter()
        .map(|entry| SeriesPoint {
            label: labels::label(table.field, entry.key, lang).to_string(),
            value: entry.count as f64,
            percent: round1(entry.percent),
        })
        .collect()
}

/// Per-status averages; an unrated group charts as 0.
pub fn average_series(averages: &[StatusAverage], lang: Language) -> Vec<SeriesPoint> {
    averages
        .iter()
        .map(|average| {
            let value = round1(average.average.unwrap_or(0.0));
            SeriesPoint {
                label: average.status.label(lang).to_string(),
                value,
                percent: round1(value / 5.0 * 100.0),
            }
        })
        .collect()
}

/// One series per status group, labelled by status.
pub fn cross_tab_series(cross_tab: &CrossTab, lang: Language) -> Vec<(String, Vec<SeriesPoint>)> {
    cross_tab
        .slices
        .iter()
        .map(|slice| {
            (
                slice.status.label(lang).to_string(),
                to_series(&slice.table, lang),
            )
        })
        .collect()
}
