//! Excel report renderer.
//!
//! One sheet per outlet. Averages sheets carry
//! {Item, Day Type, Qty, Wastage Qty, Sales, Wastage Sales}; comparison
//! sheets carry {Item, Day Type, Qty, Wastage Qty, Total, Forecast Qty,
//! Variance, Recommendation}. Presentation rules:
//!
//! - currency number format on the sales columns
//! - every cell horizontally and vertically centered
//! - consecutive equal Item values merged into one cell per run
//! - top-10 items shaded green, bottom-10 shaded red
//! - Variance cells shaded when at or beyond +/-10, with an explicit sign
//! - column widths sized to content, extra padding on Sales and Qty columns
//! - failed outlet sheets carry a visible error marker instead of a table

use dailyavg_core::{
    AggregateRow, ComparisonRow, RankSet, RenderError, Report, ReportRenderer, SheetRows,
};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

const AVERAGES_HEADERS: [&str; 6] = ["Item", "Day Type", "Qty", "Wastage Qty", "Sales", "Wastage Sales"];
const COMPARISON_HEADERS: [&str; 8] = [
    "Item", "Day Type", "Qty", "Wastage Qty", "Total", "Forecast Qty", "Variance", "Recommendation",
];

/// Excel report renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Currency prefix for the sales number format
    pub currency: String,
    /// Absolute variance at or above which a variance cell is shaded
    pub variance_threshold: f64,
    /// Fill for top-ranked items
    pub top_fill: u32,
    /// Fill for bottom-ranked items
    pub bottom_fill: u32,
    /// Fill for flagged variance cells
    pub variance_fill: u32,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            currency: "RM".into(),
            variance_threshold: 10.0,
            top_fill: 0xC6EFCE,
            bottom_fill: 0xF2DCDB,
            variance_fill: 0xFFEB9C,
        }
    }
}

/// Reusable cell formats for one workbook
struct ExcelFormats {
    header: Format,
    centered: Format,
    currency: Format,
    top_item: Format,
    bottom_item: Format,
    variance: Format,
    variance_flagged: Format,
    error_marker: Format,
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the currency prefix
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set the variance shading threshold
    pub fn variance_threshold(mut self, threshold: f64) -> Self {
        self.variance_threshold = threshold;
        self
    }

    /// Generate workbook bytes
    pub fn render_to_bytes(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = self.create_formats();

        for sheet in &report.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(&sheet.name)
                .map_err(|e| RenderError::InvalidData(format!("sheet name: {e}")))?;

            let ranks = report.ranks.get(&sheet.outlet);
            match &sheet.rows {
                SheetRows::Averages(rows) => {
                    self.write_averages_sheet(worksheet, rows, ranks, &formats)?;
                }
                SheetRows::Comparison(rows) => {
                    self.write_comparison_sheet(worksheet, rows, ranks, &formats)?;
                }
                SheetRows::Failed(message) => {
                    write_failed_sheet(worksheet, message, &formats)?;
                }
            }
        }

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Render straight to a file path
    pub fn render_to_file(
        &self,
        report: &Report,
        path: &std::path::Path,
    ) -> Result<(), RenderError> {
        let bytes = self.render_to_bytes(report)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn create_formats(&self) -> ExcelFormats {
        let centered = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        let currency_format = format!("\"{}\"#,##0.00", self.currency);

        ExcelFormats {
            header: centered.clone().set_bold(),
            currency: centered.clone().set_num_format(&currency_format),
            top_item: centered.clone().set_background_color(self.top_fill),
            bottom_item: centered.clone().set_background_color(self.bottom_fill),
            variance: centered.clone().set_num_format("+#,##0;-#,##0;0"),
            variance_flagged: centered
                .clone()
                .set_num_format("+#,##0;-#,##0;0")
                .set_background_color(self.variance_fill),
            error_marker: centered.clone().set_bold().set_font_color(0x9C0006),
            centered,
        }
    }

    fn write_averages_sheet(
        &self,
        worksheet: &mut Worksheet,
        rows: &[AggregateRow],
        ranks: Option<&RankSet>,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let mut widths = Widths::new(&AVERAGES_HEADERS);
        write_headers(worksheet, &AVERAGES_HEADERS, formats)?;

        for (i, row) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            widths.observe(0, &row.item);
            write_cell(worksheet, r, 1, row.day_type.label(), &formats.centered, &mut widths)?;
            write_opt_number(worksheet, r, 2, row.qty, &formats.centered, &mut widths)?;
            write_number(worksheet, r, 3, row.wastage_qty, &formats.centered, &mut widths)?;
            write_opt_number(worksheet, r, 4, row.sales, &formats.currency, &mut widths)?;
            write_opt_number(worksheet, r, 5, row.wastage_sales, &formats.currency, &mut widths)?;
        }

        let items: Vec<&str> = rows.iter().map(|r| r.item.as_str()).collect();
        write_item_runs(worksheet, &items, ranks, formats)?;
        widths.apply(worksheet);
        Ok(())
    }

    fn write_comparison_sheet(
        &self,
        worksheet: &mut Worksheet,
        rows: &[ComparisonRow],
        ranks: Option<&RankSet>,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let mut widths = Widths::new(&COMPARISON_HEADERS);
        write_headers(worksheet, &COMPARISON_HEADERS, formats)?;

        for (i, row) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            widths.observe(0, &row.item);
            write_cell(worksheet, r, 1, row.day_type.label(), &formats.centered, &mut widths)?;
            write_opt_number(worksheet, r, 2, row.qty, &formats.centered, &mut widths)?;
            write_number(worksheet, r, 3, row.wastage_qty, &formats.centered, &mut widths)?;
            write_opt_number(worksheet, r, 4, row.total, &formats.centered, &mut widths)?;
            write_opt_number(worksheet, r, 5, row.forecast_qty, &formats.centered, &mut widths)?;
            if let Some(variance) = row.variance {
                let format = if variance.abs() >= self.variance_threshold {
                    &formats.variance_flagged
                } else {
                    &formats.variance
                };
                write_number(worksheet, r, 6, variance, format, &mut widths)?;
            }
            write_cell(worksheet, r, 7, row.recommendation.label(), &formats.centered, &mut widths)?;
        }

        let items: Vec<&str> = rows.iter().map(|r| r.item.as_str()).collect();
        write_item_runs(worksheet, &items, ranks, formats)?;
        widths.apply(worksheet);
        Ok(())
    }
}

impl ReportRenderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &Report) -> Result<Self::Output, RenderError> {
        self.render_to_bytes(report)
    }
}

/// Column width tracker mirroring the content-sized-plus-padding heuristic:
/// +8 on Sales, +6 on Qty, +2 elsewhere
struct Widths {
    max_len: Vec<usize>,
    padding: Vec<usize>,
}

impl Widths {
    fn new(headers: &[&str]) -> Self {
        let padding = headers
            .iter()
            .map(|h| match *h {
                "Sales" => 8,
                "Qty" => 6,
                _ => 2,
            })
            .collect();
        Self {
            max_len: headers.iter().map(|h| h.len()).collect(),
            padding,
        }
    }

    fn observe(&mut self, col: usize, content: &str) {
        if content.len() > self.max_len[col] {
            self.max_len[col] = content.len();
        }
    }

    fn observe_number(&mut self, col: usize, value: f64) {
        self.observe(col, &format!("{value}"));
    }

    fn apply(&self, worksheet: &mut Worksheet) {
        for (col, (len, pad)) in self.max_len.iter().zip(&self.padding).enumerate() {
            worksheet
                .set_column_width(col as u16, (len + pad) as f64)
                .ok();
        }
    }
}

fn write_headers(
    worksheet: &mut Worksheet,
    headers: &[&str],
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &formats.header)
            .map_err(|e| RenderError::Format(e.to_string()))?;
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    text: &str,
    format: &Format,
    widths: &mut Widths,
) -> Result<(), RenderError> {
    widths.observe(col as usize, text);
    worksheet
        .write_with_format(row, col, text, format)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

fn write_number(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: f64,
    format: &Format,
    widths: &mut Widths,
) -> Result<(), RenderError> {
    widths.observe_number(col as usize, value);
    worksheet
        .write_with_format(row, col, value, format)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

/// Missing values stay blank, they are not zeros
fn write_opt_number(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    format: &Format,
    widths: &mut Widths,
) -> Result<(), RenderError> {
    if let Some(value) = value {
        write_number(worksheet, row, col, value, format, widths)?;
    }
    Ok(())
}

/// Merge consecutive equal Item values into one cell per run and apply the
/// top/bottom highlight fills.
fn write_item_runs(
    worksheet: &mut Worksheet,
    items: &[&str],
    ranks: Option<&RankSet>,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    let format_for = |item: &str| match ranks {
        Some(set) if set.top.contains(item) => &formats.top_item,
        Some(set) if set.bottom.contains(item) => &formats.bottom_item,
        _ => &formats.centered,
    };

    let mut start = 0usize;
    while start < items.len() {
        let mut end = start;
        while end + 1 < items.len() && items[end + 1] == items[start] {
            end += 1;
        }
        let item = items[start];
        let format = format_for(item);
        // Data rows begin at row 1, below the header.
        let first_row = (start + 1) as u32;
        let last_row = (end + 1) as u32;
        if end > start {
            worksheet
                .merge_range(first_row, 0, last_row, 0, item, format)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        } else {
            worksheet
                .write_with_format(first_row, 0, item, format)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }
        start = end + 1;
    }
    Ok(())
}

/// Per-outlet forecast failure marker sheet
fn write_failed_sheet(
    worksheet: &mut Worksheet,
    message: &str,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    worksheet
        .write_with_format(0, 0, "Forecast comparison unavailable", &formats.error_marker)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    worksheet
        .write_with_format(1, 0, message, &formats.centered)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    worksheet.set_column_width(0, (message.len() + 2) as f64).ok();
    Ok(())
}
