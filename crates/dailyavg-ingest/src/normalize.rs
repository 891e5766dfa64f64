//! Record normalizer for sales and wastage exports.
//!
//! The POS export renders an outlet/item hierarchy flat: repeated outlet and
//! item labels are blanked on continuation rows, subtotal marker rows are
//! interleaved with the data, and the first two header labels vary between
//! export versions. Normalization reconstructs clean records:
//!
//! 1. skip the six-row banner, take row 6 (zero-based) as the header
//! 2. force the first two header labels to `Outlet` and `Item`
//! 3. locate the required data columns, ignoring extras
//! 4. forward-fill `Outlet` and `Item` over blank continuation cells
//! 5. drop sentinel business-date rows (`Subtotal`, `Grand Total`, `NaN`)
//! 6. drop rows with a remaining missing required value

use crate::cell::Cell;
use dailyavg_core::{NormalizedRecord, ReportError};

/// Rows of banner above the header in every known export version
pub const HEADER_OFFSET: usize = 6;

/// Business-date values that mark subtotal/grand-total rows, not data
const DATE_SENTINELS: [&str; 3] = ["Subtotal", "Grand Total", "NaN"];

const DATE_COL: &str = "Business Date";
const SALES_COL: &str = "Net Sales";
const QTY_COL: &str = "Item Qty";

/// Normalize a raw export grid into clean records.
///
/// Fails with [`ReportError::Schema`] when any of the named data columns is
/// absent (the first two columns are positional and always usable).
pub fn normalize(grid: &[Vec<Cell>]) -> Result<Vec<NormalizedRecord>, ReportError> {
    let header_row = grid.get(HEADER_OFFSET).ok_or_else(|| {
        ReportError::Schema(format!(
            "export has no header row at offset {HEADER_OFFSET}"
        ))
    })?;

    let mut headers: Vec<String> = header_row
        .iter()
        .map(|c| c.as_text().unwrap_or_default())
        .collect();
    // The first two labels are inconsistent across export versions; their
    // positions are fixed, so force them.
    if let Some(first) = headers.first_mut() {
        *first = "Outlet".into();
    }
    if let Some(second) = headers.get_mut(1) {
        *second = "Item".into();
    }

    let position = |name: &str| headers.iter().position(|h| h == name);
    let missing: Vec<&str> = [DATE_COL, SALES_COL, QTY_COL]
        .into_iter()
        .filter(|&name| position(name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::Schema(missing.join(", ")));
    }
    let date_col = position(DATE_COL).unwrap();
    let sales_col = position(SALES_COL).unwrap();
    let qty_col = position(QTY_COL).unwrap();

    let mut records = Vec::new();
    let mut dropped = 0usize;
    let mut last_outlet: Option<String> = None;
    let mut last_item: Option<String> = None;

    for row in grid.iter().skip(HEADER_OFFSET + 1) {
        let cell_at = |idx: usize| row.get(idx).cloned().unwrap_or(Cell::Empty);

        // Forward-fill the grouping columns before any filtering so a
        // dropped subtotal row still carries its labels downward.
        if let Some(outlet) = cell_at(0).as_text() {
            last_outlet = Some(outlet);
        }
        if let Some(item) = cell_at(1).as_text() {
            last_item = Some(item);
        }

        let date_cell = cell_at(date_col);
        if let Cell::Text(text) = &date_cell {
            if DATE_SENTINELS.contains(&text.as_str()) {
                continue;
            }
        }

        let (Some(outlet), Some(item)) = (last_outlet.clone(), last_item.clone()) else {
            dropped += 1;
            continue;
        };
        let Some(business_date) = date_cell.as_text() else {
            dropped += 1;
            continue;
        };
        let Some(net_sales) = cell_at(sales_col).as_number() else {
            dropped += 1;
            continue;
        };
        let Some(item_qty) = cell_at(qty_col).as_number() else {
            dropped += 1;
            continue;
        };

        records.push(NormalizedRecord {
            outlet,
            item,
            business_date,
            net_sales,
            item_qty,
        });
    }

    if dropped > 0 {
        tracing::debug!(dropped, "rows dropped during normalization");
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    fn num(n: f64) -> Cell {
        Cell::Number(n)
    }

    /// Six banner rows, a header with scrambled first labels, then data rows
    fn grid_with(rows: Vec<Vec<Cell>>) -> Vec<Vec<Cell>> {
        let mut grid: Vec<Vec<Cell>> = (0..HEADER_OFFSET)
            .map(|i| vec![text(&format!("banner {i}"))])
            .collect();
        grid.push(vec![
            text("Store / Outlet Name"),
            text("Product"),
            text("Business Date"),
            text("Net Sales"),
            text("Item Qty"),
        ]);
        grid.extend(rows);
        grid
    }

    #[test]
    fn forces_first_two_headers_and_reads_rows() {
        let grid = grid_with(vec![vec![
            text("Outlet: X-KOMUGI-Bakery"),
            text("SKU001-Croissant"),
            text("2026-08-24"),
            num(10.0),
            num(5.0),
        ]]);
        let records = normalize(&grid).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outlet, "Outlet: X-KOMUGI-Bakery");
        assert_eq!(records[0].item, "SKU001-Croissant");
        assert_eq!(records[0].business_date, "2026-08-24");
        assert_eq!(records[0].net_sales, 10.0);
        assert_eq!(records[0].item_qty, 5.0);
    }

    #[test]
    fn forward_fills_blank_grouping_cells() {
        let grid = grid_with(vec![
            vec![
                text("Outlet A"),
                text("SKU1-Bun"),
                text("2026-08-24"),
                num(10.0),
                num(2.0),
            ],
            vec![
                Cell::Empty,
                Cell::Empty,
                text("2026-08-25"),
                num(12.0),
                num(3.0),
            ],
            vec![
                Cell::Empty,
                text("SKU2-Loaf"),
                text("2026-08-25"),
                num(20.0),
                num(4.0),
            ],
        ]);
        let records = normalize(&grid).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].outlet, "Outlet A");
        assert_eq!(records[1].item, "SKU1-Bun");
        assert_eq!(records[2].outlet, "Outlet A");
        assert_eq!(records[2].item, "SKU2-Loaf");
    }

    #[test]
    fn drops_sentinel_and_incomplete_rows() {
        let grid = grid_with(vec![
            vec![
                text("Outlet A"),
                text("SKU1-Bun"),
                text("2026-08-24"),
                num(10.0),
                num(2.0),
            ],
            // Subtotal marker: never a record, never affects averages.
            vec![Cell::Empty, Cell::Empty, text("Subtotal"), num(10.0), num(2.0)],
            vec![Cell::Empty, Cell::Empty, text("Grand Total"), num(10.0), num(2.0)],
            vec![Cell::Empty, Cell::Empty, text("NaN"), num(10.0), num(2.0)],
            // Missing qty: dropped.
            vec![Cell::Empty, Cell::Empty, text("2026-08-25"), num(11.0), Cell::Empty],
        ]);
        let records = normalize(&grid).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].business_date, "2026-08-24");
    }

    #[test]
    fn date_cells_canonicalize_for_the_join_key() {
        let grid = grid_with(vec![vec![
            text("Outlet A"),
            text("SKU1-Bun"),
            Cell::Date(NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()),
            num(10.0),
            num(2.0),
        ]]);
        let records = normalize(&grid).unwrap();
        assert_eq!(records[0].business_date, "2026-08-24");
    }

    #[test]
    fn missing_columns_fail_with_schema_error() {
        let mut grid: Vec<Vec<Cell>> = (0..HEADER_OFFSET).map(|_| vec![Cell::Empty]).collect();
        grid.push(vec![text("Outlet"), text("Item"), text("Comments")]);
        let err = normalize(&grid).unwrap_err();
        match err {
            ReportError::Schema(msg) => {
                assert!(msg.contains("Business Date"));
                assert!(msg.contains("Net Sales"));
                assert!(msg.contains("Item Qty"));
            }
            other => panic!("expected Schema error, got {other}"),
        }
    }

    #[test]
    fn short_export_fails_with_schema_error() {
        let grid = vec![vec![text("only one row")]];
        assert!(matches!(normalize(&grid), Err(ReportError::Schema(_))));
    }
}
