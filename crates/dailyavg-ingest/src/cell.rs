//! Boundary cell type.
//!
//! calamine's `Data` enum is converted into `Cell` at the read boundary so
//! the normalizer and the rest of the pipeline never see spreadsheet-library
//! types. Whitespace-only text collapses to `Empty`, which is what drives
//! the forward-fill of the grouping columns.

use calamine::{Data, Range};
use chrono::NaiveDate;

/// A single spreadsheet cell value
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl Cell {
    pub fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) | Data::DurationIso(_) => Self::Empty,
            Data::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Self::Empty
                } else {
                    Self::Text(trimmed.to_string())
                }
            }
            Data::Float(f) => Self::Number(*f),
            Data::Int(i) => Self::Number(*i as f64),
            Data::Bool(b) => Self::Number(if *b { 1.0 } else { 0.0 }),
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(|ndt| Self::Date(ndt.date()))
                .unwrap_or(Self::Empty),
            Data::DateTimeIso(s) => NaiveDate::parse_from_str(&s[..s.len().min(10)], "%Y-%m-%d")
                .map(Self::Date)
                .unwrap_or(Self::Empty),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Canonical text form, used for join keys and labels.
    ///
    /// Dates render as ISO `YYYY-MM-DD` so a date-typed cell and its string
    /// twin produce the same reconciliation key.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(format!("{n}")),
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Self::Empty => None,
        }
    }

    /// Numeric value, accepting numeric text
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Convert a calamine range into a plain cell grid
pub fn grid(range: &Range<Data>) -> Vec<Vec<Cell>> {
    range
        .rows()
        .map(|row| row.iter().map(Cell::from_data).collect())
        .collect()
}
