//! # dailyavg-core
//!
//! Core domain model and traits for the dailyavg report engine.
//!
//! This crate provides:
//! - Domain types: `NormalizedRecord`, `ReconciledRecord`, `AggregateRow`,
//!   `ComparisonRow`, `Report`
//! - Classification and decision types: `DayType`, `Recommendation`
//! - Configuration: `NamingConfig`, `OutletEntry`, `ReportConfig`
//! - The `ReportRenderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use dailyavg_core::{DayType, Recommendation};
//!
//! let saturday = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
//! assert_eq!(DayType::classify(saturday), DayType::Saturday);
//!
//! // Under forecast with low wastage: produce more.
//! let rec = Recommendation::decide(Some(-12.0), 3.0);
//! assert_eq!(rec, Recommendation::IncreaseProduction);
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

pub mod config;

pub use config::{NamingConfig, OutletEntry, ReportConfig};

// ============================================================================
// Type Aliases
// ============================================================================

/// Outlet display value as it appears in the aggregate table
pub type OutletName = String;

/// Item display value after code stripping
pub type ItemName = String;

// ============================================================================
// Day Classification
// ============================================================================

/// Coarse grouping of calendar dates used for demand pattern averaging.
///
/// The enum order is the report order: `Weekday < Saturday < Sunday`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayType {
    Weekday,
    Saturday,
    Sunday,
}

impl DayType {
    /// All day types in report order
    pub const ALL: [DayType; 3] = [DayType::Weekday, DayType::Saturday, DayType::Sunday];

    /// Classify a calendar date: Mon-Fri are weekdays, Sat and Sun their own.
    ///
    /// Total over all valid dates; every date maps to exactly one day type.
    pub fn classify(date: NaiveDate) -> Self {
        match date.weekday().num_days_from_monday() {
            0..=4 => Self::Weekday,
            5 => Self::Saturday,
            _ => Self::Sunday,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Weekday => "Weekday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Records
// ============================================================================

/// A clean row from a sales or wastage export after normalization.
///
/// `business_date` is kept as the canonical cell text (date cells are
/// rendered as ISO `YYYY-MM-DD`) so that the reconciliation join key is
/// stable regardless of how the source sheet typed the column. Parsing into
/// a calendar date happens in the reconciler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub outlet: String,
    pub item: String,
    pub business_date: String,
    pub net_sales: f64,
    pub item_qty: f64,
}

/// Result of the full outer join of sales and wastage records on
/// (outlet, item, business date).
///
/// A record present in only one source has `None` for the other source's
/// measures. `day_type` is `None` when the business date failed to parse;
/// such records are excluded (and counted) by the aggregator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRecord {
    pub outlet: String,
    pub item: String,
    pub business_date: String,
    pub day_type: Option<DayType>,
    pub sales: Option<f64>,
    pub qty: Option<f64>,
    pub wastage_sales: Option<f64>,
    pub wastage_qty: Option<f64>,
}

/// One row of the long-form report table: per-group arithmetic means.
///
/// `qty`, `sales` and `wastage_sales` stay `None` when every reconciled
/// value for that measure was missing. `wastage_qty` defaults to 0 after
/// rounding, matching the report's presentation rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub outlet: OutletName,
    pub item: ItemName,
    pub day_type: DayType,
    pub qty: Option<f64>,
    pub wastage_qty: f64,
    pub sales: Option<f64>,
    pub wastage_sales: Option<f64>,
}

/// Per (outlet, item) mean of quantity across day types, used only for ranking
#[derive(Clone, Debug, PartialEq)]
pub struct ItemTotal {
    pub outlet: OutletName,
    pub item: ItemName,
    pub total_avg_qty: f64,
}

/// Per-outlet sets of item names to highlight in the rendered report
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RankSet {
    pub top: HashSet<ItemName>,
    pub bottom: HashSet<ItemName>,
}

// ============================================================================
// Forecast
// ============================================================================

/// Long-form forecast figure: one row per item and day type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub item: ItemName,
    pub day_type: DayType,
    pub qty: f64,
}

/// Parsed forecast workbook, keyed by outlet code.
///
/// Sheets that were missing or unreadable land in `errors` instead of
/// failing the whole workbook; the comparator turns each error into a
/// per-outlet failure sheet so the remaining outlets still render.
#[derive(Clone, Debug, Default)]
pub struct ForecastSet {
    pub outlets: BTreeMap<String, Vec<ForecastRow>>,
    pub errors: BTreeMap<String, String>,
}

/// Actuals-vs-forecast comparison row for one item and day type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub item: ItemName,
    pub day_type: DayType,
    pub qty: Option<f64>,
    pub wastage_qty: f64,
    /// Qty + WastageQty; `None` when qty itself is unknown
    pub total: Option<f64>,
    /// `None` for actuals with no matching forecast row
    pub forecast_qty: Option<f64>,
    /// Total - ForecastQty, rounded to 0 decimals; `None` when either side is
    pub variance: Option<f64>,
    pub recommendation: Recommendation,
}

/// Production adjustment suggestion derived from variance and wastage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    IncreaseProduction,
    DecreaseProduction,
    Ok,
}

impl Recommendation {
    /// Apply the three-way recommendation rule.
    ///
    /// - variance <= -10 and wastage <= 5: increase production
    /// - variance >= 10 and wastage >= 5: decrease production
    /// - anything else, including an unknown variance: OK
    pub fn decide(variance: Option<f64>, wastage_qty: f64) -> Self {
        match variance {
            Some(v) if v <= -10.0 && wastage_qty <= 5.0 => Self::IncreaseProduction,
            Some(v) if v >= 10.0 && wastage_qty >= 5.0 => Self::DecreaseProduction,
            _ => Self::Ok,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::IncreaseProduction => "Increase Production (low wastage, under forecast)",
            Self::DecreaseProduction => "Decrease Production (high wastage, over forecast)",
            Self::Ok => "OK",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Report
// ============================================================================

/// Table carried by a single output sheet
#[derive(Clone, Debug, PartialEq)]
pub enum SheetRows {
    /// Plain averages (no forecast supplied, or outlet not in the directory)
    Averages(Vec<AggregateRow>),
    /// Actuals joined against the outlet's forecast
    Comparison(Vec<ComparisonRow>),
    /// Per-outlet forecast failure; the message is rendered as a visible marker
    Failed(String),
}

/// One output sheet for one outlet
#[derive(Clone, Debug, PartialEq)]
pub struct OutletSheet {
    /// Outlet display value as it appears in the aggregate table
    pub outlet: OutletName,
    /// Workbook sheet name (prefix stripped, truncated to 31 chars)
    pub name: String,
    pub rows: SheetRows,
}

/// Row counts reported alongside the output workbook.
///
/// `undated_rows` makes the null-business-date exclusion explicit instead of
/// letting rows vanish silently during grouping.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub sales_rows: usize,
    pub wastage_rows: usize,
    pub reconciled_rows: usize,
    pub undated_rows: usize,
    pub aggregate_rows: usize,
}

/// Final product of the pipeline, handed to a renderer
#[derive(Clone, Debug)]
pub struct Report {
    /// Sheets in outlet order
    pub sheets: Vec<OutletSheet>,
    /// Highlight sets keyed by outlet display value
    pub ranks: HashMap<OutletName, RankSet>,
    pub summary: PipelineSummary,
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering seam.
///
/// The pipeline never depends on a spreadsheet library's object model; it
/// produces a `Report` and a renderer turns it into bytes or files.
pub trait ReportRenderer {
    type Output;

    fn render(&self, report: &Report) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Numeric helpers
// ============================================================================

/// Round to a fixed number of decimal places, half away from zero.
///
/// Idempotent: rounding an already-rounded value changes nothing.
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ============================================================================
// Errors
// ============================================================================

/// Pipeline error
#[derive(Debug, Error)]
pub enum ReportError {
    /// The uploaded file is not a readable spreadsheet
    #[error("not a readable spreadsheet: {0}")]
    Format(String),

    /// A required column is absent from a sales/wastage export
    #[error("required column(s) missing from export: {0}")]
    Schema(String),

    /// A configured outlet code has no forecast sheet (per-outlet, non-fatal)
    #[error("no forecast sheet for outlet {0}")]
    OutletForecastMissing(String),

    /// Zero rows remained after normalization and reconciliation
    #[error("no rows remained after reconciliation; check that the exports overlap")]
    EmptyResult,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
