//! Forecast sheet parsing.
//!
//! Each outlet's forecast sheet is wide: an `Item Name` column plus
//! day-range quantity columns. Most outlets report a single Mon-Fri column;
//! a few report Mon-Thu and Fri separately, and their Weekday figure is the
//! mean of the two. The sheet is reshaped long, one `ForecastRow` per item
//! and day type, which is the shape the comparator joins against.
//!
//! Errors here are per-outlet: the caller records the message and moves on
//! to the next outlet code.

use crate::cell::Cell;
use dailyavg_core::{DayType, ForecastRow};

enum WeekdaySource {
    /// Single Mon-Fri column
    Single(usize),
    /// Mon-Thu and Fri sub-columns, averaged
    Split(usize, usize),
}

/// Reshape one outlet's forecast sheet into long-form rows.
///
/// Header matching is case-insensitive substring matching, since the
/// day-range labels vary ("Mon-Fri", "Mon - Fri (avg)", ...).
pub fn parse_sheet(grid: &[Vec<Cell>], split_weekday: bool) -> Result<Vec<ForecastRow>, String> {
    let header_row = grid.first().ok_or("forecast sheet is empty")?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|c| c.as_text().unwrap_or_default().to_lowercase())
        .collect();
    let find = |pred: &dyn Fn(&str) -> bool| headers.iter().position(|h| pred(h));

    let item_col = find(&|h: &str| h.contains("item"))
        .ok_or("forecast sheet has no Item Name column")?;
    let weekday = if split_weekday {
        let mon_thu = find(&|h: &str| h.contains("mon") && h.contains("thu"))
            .ok_or("split-weekday forecast sheet has no Mon-Thu column")?;
        let fri = find(&|h: &str| h.contains("fri") && !h.contains("mon"))
            .ok_or("split-weekday forecast sheet has no Fri column")?;
        WeekdaySource::Split(mon_thu, fri)
    } else {
        WeekdaySource::Single(
            find(&|h: &str| h.contains("mon")).ok_or("forecast sheet has no Mon-Fri column")?,
        )
    };
    let sat_col = find(&|h: &str| h.contains("sat"));
    let sun_col = find(&|h: &str| h.contains("sun"));

    let mut rows = Vec::new();
    for row in grid.iter().skip(1) {
        let cell_at = |idx: usize| row.get(idx).cloned().unwrap_or(Cell::Empty);
        let Some(item) = cell_at(item_col).as_text() else {
            continue;
        };

        let weekday_qty = match &weekday {
            WeekdaySource::Single(col) => cell_at(*col).as_number(),
            WeekdaySource::Split(mon_thu, fri) => {
                match (cell_at(*mon_thu).as_number(), cell_at(*fri).as_number()) {
                    (Some(a), Some(b)) => Some((a + b) / 2.0),
                    (Some(a), None) => Some(a),
                    (None, Some(b)) => Some(b),
                    (None, None) => None,
                }
            }
        };

        let mut push = |day_type: DayType, qty: Option<f64>| {
            if let Some(qty) = qty {
                rows.push(ForecastRow {
                    item: item.clone(),
                    day_type,
                    qty,
                });
            }
        };
        push(DayType::Weekday, weekday_qty);
        push(DayType::Saturday, sat_col.and_then(|c| cell_at(c).as_number()));
        push(DayType::Sunday, sun_col.and_then(|c| cell_at(c).as_number()));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    fn num(n: f64) -> Cell {
        Cell::Number(n)
    }

    #[test]
    fn single_weekday_column_reshapes_long() {
        let grid = vec![
            vec![text("Item Name"), text("Mon-Fri"), text("Sat"), text("Sun")],
            vec![text("Croissant"), num(8.0), num(12.0), num(14.0)],
        ];
        let rows = parse_sheet(&grid, false).unwrap();
        assert_eq!(
            rows,
            vec![
                ForecastRow { item: "Croissant".into(), day_type: DayType::Weekday, qty: 8.0 },
                ForecastRow { item: "Croissant".into(), day_type: DayType::Saturday, qty: 12.0 },
                ForecastRow { item: "Croissant".into(), day_type: DayType::Sunday, qty: 14.0 },
            ]
        );
    }

    #[test]
    fn split_weekday_columns_average() {
        let grid = vec![
            vec![text("Item Name"), text("Mon-Thu"), text("Fri"), text("Sat"), text("Sun")],
            vec![text("Croissant"), num(8.0), num(12.0), num(9.0), num(7.0)],
        ];
        let rows = parse_sheet(&grid, true).unwrap();
        let weekday = rows.iter().find(|r| r.day_type == DayType::Weekday).unwrap();
        assert_eq!(weekday.qty, 10.0);
    }

    #[test]
    fn blank_item_rows_are_skipped() {
        let grid = vec![
            vec![text("Item Name"), text("Mon-Fri")],
            vec![Cell::Empty, num(8.0)],
            vec![text("Bun"), num(5.0)],
        ];
        let rows = parse_sheet(&grid, false).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item, "Bun");
    }

    #[test]
    fn missing_item_column_is_an_error() {
        let grid = vec![vec![text("Mon-Fri"), text("Sat")]];
        assert!(parse_sheet(&grid, false).is_err());
    }
}
