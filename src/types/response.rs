//! @dose
//! purpose: Typed view of one survey response row. Rows come from the response sheet export
//!     as a JSON array of 16-cell arrays; multi-line cells (commits, other authors, issues)
//!     are split into lines.
//!
//! when-editing:
//!     - !Column indices must follow the form's question order (timestamp first)
//!     - !COLUMN_COUNT must equal the number of COL_* constants
//!
//! invariants:
//!     - Quantified items always carry both metrics
//!     - Rows whose first cell is empty are skipped by read_rows
//!
//! gotchas:
//!     - Spreadsheet exports may hold numbers, bools or null in cells; they are stringified
//!     - Only the exact answer "Yes" marks an item as quantified

use crate::text::split_lines;
use serde_json::Value;
use thiserror::Error;

pub const COL_TIMESTAMP: usize = 0;
pub const COL_EMAIL: usize = 1;
pub const COL_SHORT_DESCRIPTION: usize = 2;
pub const COL_LAND_DATE: usize = 3;
pub const COL_PERF_AREA: usize = 4;
pub const COL_COMMITS: usize = 5;
pub const COL_FIRST_AUTHOR: usize = 6;
pub const COL_OTHER_AUTHORS: usize = 7;
pub const COL_ISSUES: usize = 8;
pub const COL_DOC_LINK: usize = 9;
pub const COL_IS_QUANTIFIED: usize = 10;
pub const COL_OLD_METRIC: usize = 11;
pub const COL_NEW_METRIC: usize = 12;
pub const COL_UNIT: usize = 13;
pub const COL_METRIC_DESCRIPTION: usize = 14;
pub const COL_METRIC_LINK: usize = 15;
pub const COLUMN_COUNT: usize = 16;

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("Row {row} has {actual} columns, expected {expected}")]
    RowLength {
        row: usize,
        actual: usize,
        expected: usize,
    },
    #[error("Row {row}: invalid {column} '{value}'")]
    InvalidMetric {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("Failed to parse response rows: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Response rows must be a JSON array of arrays")]
    NotRows,
}

/// Before/after numbers of a quantified improvement.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub old: f64,
    pub new: f64,
    pub unit: String,
    pub description: String,
    pub link: String,
}

impl Metric {
    /// Signed change in percent. Time units report the speedup `old / new - 1`,
    /// everything else the relative change `new / old - 1`.
    ///
    /// `None` when the divisor is zero.
    pub fn change_percentage(&self, is_time: bool) -> Option<f64> {
        let (numerator, divisor) = if is_time {
            (self.old, self.new)
        } else {
            (self.new, self.old)
        };
        (divisor != 0.0).then(|| (numerator / divisor - 1.0) * 100.0)
    }
}

/// One submitted improvement.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseItem {
    pub timestamp: String,
    pub email: String,
    pub short_description: String,
    pub land_date: String,
    pub perf_area: String,
    pub commits: Vec<String>,
    pub first_author: String,
    pub other_authors: Vec<String>,
    pub issues: Vec<String>,
    pub doc_link: Option<String>,
    /// Present exactly when the item is quantified
    pub metric: Option<Metric>,
}

fn lines(cell: &str) -> Vec<String> {
    split_lines(cell).into_iter().map(str::to_string).collect()
}

fn parse_metric(row: usize, column: &'static str, value: &str) -> Result<f64, ResponseError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ResponseError::InvalidMetric {
            row,
            column,
            value: value.to_string(),
        })
}

impl ResponseItem {
    /// Parse a row; `index` is only used in error messages.
    pub fn from_row(index: usize, row: &[String]) -> Result<Self, ResponseError> {
        if row.len() != COLUMN_COUNT {
            return Err(ResponseError::RowLength {
                row: index,
                actual: row.len(),
                expected: COLUMN_COUNT,
            });
        }

        let metric = if row[COL_IS_QUANTIFIED] == "Yes" {
            Some(Metric {
                old: parse_metric(index, "old metric", &row[COL_OLD_METRIC])?,
                new: parse_metric(index, "new metric", &row[COL_NEW_METRIC])?,
                unit: row[COL_UNIT].clone(),
                description: row[COL_METRIC_DESCRIPTION].clone(),
                link: row[COL_METRIC_LINK].clone(),
            })
        } else {
            None
        };

        let doc_link = row[COL_DOC_LINK].trim();

        Ok(Self {
            timestamp: row[COL_TIMESTAMP].clone(),
            email: row[COL_EMAIL].clone(),
            short_description: row[COL_SHORT_DESCRIPTION].clone(),
            land_date: row[COL_LAND_DATE].clone(),
            perf_area: row[COL_PERF_AREA].clone(),
            commits: lines(&row[COL_COMMITS]),
            first_author: row[COL_FIRST_AUTHOR].clone(),
            other_authors: lines(&row[COL_OTHER_AUTHORS]),
            issues: lines(&row[COL_ISSUES]),
            doc_link: (!doc_link.is_empty()).then(|| doc_link.to_string()),
            metric,
        })
    }

    pub fn is_quantified(&self) -> bool {
        self.metric.is_some()
    }

    /// First author followed by the other authors.
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.first_author.as_str()).chain(self.other_authors.iter().map(String::as_str))
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse exported response rows (a JSON array of arrays), skipping empty rows.
pub fn read_rows(json: &str) -> Result<Vec<ResponseItem>, ResponseError> {
    let value: Value = serde_json::from_str(json)?;
    let rows = value.as_array().ok_or(ResponseError::NotRows)?;

    let mut items = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .as_array()
            .ok_or(ResponseError::NotRows)?
            .iter()
            .map(cell_text)
            .collect();
        if cells.first().map_or(true, |first| first.is_empty()) {
            continue;
        }
        items.push(ResponseItem::from_row(index, &cells)?);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        let mut row: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
        row.resize(COLUMN_COUNT, String::new());
        row
    }

    fn quantified_row() -> Vec<String> {
        row(&[
            "7/9/2020 10:00:00",
            "xyz123@google.com",
            "75% memory reduction for grid view of memory intensive widgets",
            "7/8/2020",
            "Memory",
            "https://github.com/flutter/flutter/pull/61033\nhttps://github.com/flutter/flutter/pull/61025",
            "xyz123@google.com",
            "abc123@google.com\r\nabc456@google.com\n",
            "https://github.com/flutter/flutter/issues/61006",
            "",
            "Yes",
            "1177721",
            "195432",
            "Bytes",
            "memory usage in the grid view",
            "https://flutter-flutter-perf.skia.org/e/",
        ])
    }

    #[test]
    fn test_from_row_quantified() {
        let item = ResponseItem::from_row(0, &quantified_row()).unwrap();
        assert!(item.is_quantified());
        assert_eq!(item.perf_area, "Memory");
        assert_eq!(item.commits.len(), 2);
        assert_eq!(item.other_authors, vec!["abc123@google.com", "abc456@google.com"]);
        assert_eq!(
            item.authors().collect::<Vec<_>>(),
            vec!["xyz123@google.com", "abc123@google.com", "abc456@google.com"]
        );
        assert_eq!(item.issues, vec!["https://github.com/flutter/flutter/issues/61006"]);
        assert_eq!(item.doc_link, None);

        let metric = item.metric.unwrap();
        assert_eq!(metric.old, 1177721.0);
        assert_eq!(metric.new, 195432.0);
        assert_eq!(metric.unit, "Bytes");
    }

    #[test]
    fn test_from_row_other_improvement() {
        let item = ResponseItem::from_row(
            3,
            &row(&[
                "6/16/2020",
                "k@google.com",
                "Timeline summary now includes CPU/GPU/memory for iOS",
                "6/15/2020",
                "Memory, Energy",
                "https://github.com/flutter/engine/commit/ca2a370578c2685a6f5fab1e4f17b4331c461e1c",
                "k123@google.com",
                "",
                "",
                " http://flutter.dev/go/engine-cpu-profiling ",
                "No",
                "not a number",
            ]),
        )
        .unwrap();
        assert!(!item.is_quantified());
        assert!(item.other_authors.is_empty());
        assert!(item.issues.is_empty());
        assert_eq!(item.doc_link.as_deref(), Some("http://flutter.dev/go/engine-cpu-profiling"));
    }

    #[test]
    fn test_row_length_mismatch() {
        let err = ResponseItem::from_row(2, &["a".to_string(), "b".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            ResponseError::RowLength {
                row: 2,
                actual: 2,
                expected: COLUMN_COUNT
            }
        ));
    }

    #[test]
    fn test_invalid_metric() {
        let mut cells = quantified_row();
        cells[COL_NEW_METRIC] = "".to_string();
        let err = ResponseItem::from_row(1, &cells).unwrap_err();
        assert_eq!(err.to_string(), "Row 1: invalid new metric ''");
    }

    #[test]
    fn test_change_percentage() {
        let metric = Metric {
            old: 1177721.0,
            new: 195432.0,
            unit: "Bytes".to_string(),
            description: String::new(),
            link: String::new(),
        };
        let change = metric.change_percentage(false).unwrap();
        assert!((change - -83.405).abs() < 0.01, "change = {change}");

        let timing = Metric {
            old: 20.0,
            new: 16.0,
            unit: "ms".to_string(),
            ..metric
        };
        assert!((timing.change_percentage(true).unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_change_percentage_with_zero_divisor() {
        let metric = Metric {
            old: 0.0,
            new: 12.0,
            unit: "Bytes".to_string(),
            description: String::new(),
            link: String::new(),
        };
        assert_eq!(metric.change_percentage(false), None);
        // The speedup divides by the new value instead.
        assert!(metric.change_percentage(true).is_some());

        let timing = Metric {
            old: 20.0,
            new: 0.0,
            ..metric
        };
        assert_eq!(timing.change_percentage(true), None);
        assert_eq!(timing.change_percentage(false), Some(-100.0));
    }

    #[test]
    fn test_read_rows_skips_empty_rows_and_stringifies_cells() {
        let json = r#"[
            ["2020-07-09", "a@google.com", "desc", "7/8/2020", "Speed",
             "cl/1", "a@google.com", null, "", "", "Yes", 20, 10.5, "ms", "frame time", "http://m"],
            [],
            ["", "ignored"]
        ]"#;
        let items = read_rows(json).unwrap();
        assert_eq!(items.len(), 1);
        let metric = items[0].metric.as_ref().unwrap();
        assert_eq!(metric.old, 20.0);
        assert_eq!(metric.new, 10.5);
        assert!(items[0].other_authors.is_empty());
    }

    #[test]
    fn test_read_rows_rejects_non_rows() {
        assert!(matches!(read_rows(r#"{"a": 1}"#), Err(ResponseError::NotRows)));
        assert!(matches!(read_rows("[1]"), Err(ResponseError::NotRows)));
        assert!(matches!(read_rows("["), Err(ResponseError::Json(_))));
    }
}
