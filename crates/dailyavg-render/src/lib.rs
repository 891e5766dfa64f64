//! # dailyavg-render
//!
//! Rendering backends for dailyavg reports.
//!
//! This crate provides the Excel workbook renderer consuming the pipeline's
//! final tables plus highlight directives. The pipeline itself never touches
//! a spreadsheet library; everything presentation-shaped lives here behind
//! the core `ReportRenderer` trait.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dailyavg_core::ReportRenderer;
//! use dailyavg_render::ExcelRenderer;
//!
//! let renderer = ExcelRenderer::new().currency("RM");
//! let bytes = renderer.render(&report)?;
//! std::fs::write("avg_sales_by_outlet.xlsx", bytes)?;
//! ```

pub mod excel;

pub use excel::ExcelRenderer;
