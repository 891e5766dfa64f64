//! # dailyavg-pipeline
//!
//! The data-reconciliation and aggregation pipeline:
//! normalized records in, a renderable [`Report`] out.
//!
//! Stages run strictly left to right, single-threaded, over in-memory
//! tables; each stage produces a new immutable table consumed by the next:
//!
//! 1. [`reconcile`] - outer join of sales and wastage on
//!    (outlet, item, business date), day-type classification
//! 2. [`aggregate`] - grouped null-skipping means, naming transforms,
//!    rounding, fixed sort order
//! 3. [`rank`] - per-outlet top/bottom item sets for highlighting
//! 4. [`forecast`] - optional per-outlet variance comparison with
//!    rule-based recommendations
//!
//! ## Example
//!
//! ```rust,ignore
//! use dailyavg_core::ReportConfig;
//! use dailyavg_pipeline::run;
//!
//! let report = run(&sales, &wastage, None, &ReportConfig::default())?;
//! assert!(!report.sheets.is_empty());
//! ```

pub mod aggregate;
pub mod forecast;
pub mod rank;
pub mod reconcile;

use dailyavg_core::{
    AggregateRow, ForecastSet, NormalizedRecord, OutletEntry, OutletSheet, PipelineSummary,
    Report, ReportConfig, ReportError, SheetRows,
};

/// Run the whole pipeline over normalized inputs.
///
/// With a forecast, outlets matched in the directory get comparison sheets;
/// an outlet whose forecast sheet is missing or unreadable gets a `Failed`
/// sheet and the remaining outlets are unaffected. Outlets outside the
/// directory keep their plain averages sheet either way.
pub fn run(
    sales: &[NormalizedRecord],
    wastage: &[NormalizedRecord],
    forecast: Option<&ForecastSet>,
    config: &ReportConfig,
) -> Result<Report, ReportError> {
    let reconciled = reconcile::reconcile(sales, wastage);
    if reconciled.is_empty() {
        return Err(ReportError::EmptyResult);
    }
    tracing::info!(rows = reconciled.len(), "reconciled sales and wastage");

    let aggregated = aggregate::aggregate(&reconciled, &config.naming);
    if aggregated.rows.is_empty() {
        return Err(ReportError::EmptyResult);
    }
    tracing::info!(
        rows = aggregated.rows.len(),
        excluded = aggregated.undated_rows,
        "aggregated per outlet, item and day type"
    );

    let ranks = rank::rank(&aggregated.rows);

    let mut sheets = Vec::new();
    for (outlet, rows) in split_by_outlet(&aggregated.rows) {
        let name = config.naming.sheet_name(&outlet);
        let sheet_rows = match (forecast, directory_match(config, &outlet)) {
            (Some(set), Some(entry)) => match set.outlets.get(&entry.code) {
                Some(forecast_rows) => {
                    SheetRows::Comparison(forecast::compare_outlet(&rows, forecast_rows))
                }
                None => {
                    let message = set.errors.get(&entry.code).cloned().unwrap_or_else(|| {
                        ReportError::OutletForecastMissing(entry.code.clone()).to_string()
                    });
                    SheetRows::Failed(message)
                }
            },
            _ => SheetRows::Averages(rows),
        };
        sheets.push(OutletSheet {
            outlet,
            name,
            rows: sheet_rows,
        });
    }

    let summary = PipelineSummary {
        sales_rows: sales.len(),
        wastage_rows: wastage.len(),
        reconciled_rows: reconciled.len(),
        undated_rows: aggregated.undated_rows,
        aggregate_rows: aggregated.rows.len(),
    };

    Ok(Report {
        sheets,
        ranks,
        summary,
    })
}

/// Split the sorted aggregate table into per-outlet runs, preserving order
fn split_by_outlet(rows: &[AggregateRow]) -> Vec<(String, Vec<AggregateRow>)> {
    let mut groups: Vec<(String, Vec<AggregateRow>)> = Vec::new();
    for row in rows {
        match groups.last_mut() {
            Some((outlet, group)) if *outlet == row.outlet => group.push(row.clone()),
            _ => groups.push((row.outlet.clone(), vec![row.clone()])),
        }
    }
    groups
}

/// Find the directory entry whose display name the outlet value contains,
/// case-insensitively
fn directory_match<'a>(config: &'a ReportConfig, outlet: &str) -> Option<&'a OutletEntry> {
    let haystack = outlet.to_lowercase();
    config
        .outlets
        .iter()
        .find(|entry| haystack.contains(&entry.name.to_lowercase()))
}
