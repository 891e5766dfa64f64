//! # dailyavg-ingest
//!
//! Spreadsheet reading and record normalization for the dailyavg pipeline.
//!
//! This crate provides:
//! - The `Cell` boundary type converting calamine cells into plain values
//! - The record normalizer for sales/wastage exports
//! - Forecast workbook parsing (wide per-outlet sheets into long form)
//!
//! Workbook I/O stays at the entry points below; normalization and reshaping
//! are pure functions over cell grids so they can be tested without files.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dailyavg_ingest::read_export;
//!
//! let sales = read_export(Path::new("product_sales.xlsx"))?;
//! assert!(!sales.is_empty());
//! ```

pub mod cell;
pub mod forecast;
pub mod normalize;

pub use cell::Cell;

use calamine::{open_workbook_auto, Reader};
use dailyavg_core::{ForecastSet, NormalizedRecord, ReportConfig, ReportError};
use std::path::Path;

/// Read and normalize a product-sales or wastage-sales export.
///
/// The relevant table lives on the first worksheet, with the header row
/// after a fixed six-row banner (see [`normalize::HEADER_OFFSET`]).
pub fn read_export(path: &Path) -> Result<Vec<NormalizedRecord>, ReportError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ReportError::Format(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::Format("workbook has no sheets".into()))?
        .map_err(|e| ReportError::Format(e.to_string()))?;

    let grid = cell::grid(&range);
    let records = normalize::normalize(&grid)?;
    tracing::info!(
        rows = records.len(),
        file = %path.display(),
        "normalized export"
    );
    Ok(records)
}

/// Read a forecast workbook: one sheet per configured outlet code.
///
/// A missing or unreadable sheet is a per-outlet failure recorded in
/// [`ForecastSet::errors`]; only a workbook that cannot be opened at all is
/// fatal. This keeps one bad outlet from aborting the other thirteen.
pub fn read_forecast(path: &Path, config: &ReportConfig) -> Result<ForecastSet, ReportError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ReportError::Format(e.to_string()))?;

    let mut set = ForecastSet::default();
    for entry in &config.outlets {
        match workbook.worksheet_range(&entry.code) {
            Ok(range) => {
                let grid = cell::grid(&range);
                match forecast::parse_sheet(&grid, config.has_split_weekday(&entry.code)) {
                    Ok(rows) => {
                        set.outlets.insert(entry.code.clone(), rows);
                    }
                    Err(message) => {
                        tracing::warn!(outlet = %entry.code, %message, "forecast sheet rejected");
                        set.errors.insert(entry.code.clone(), message);
                    }
                }
            }
            Err(_) => {
                let err = ReportError::OutletForecastMissing(entry.code.clone());
                tracing::warn!(outlet = %entry.code, "forecast sheet missing");
                set.errors.insert(entry.code.clone(), err.to_string());
            }
        }
    }
    Ok(set)
}
