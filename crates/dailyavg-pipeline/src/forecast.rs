//! Forecast comparator: actuals vs supplied forecast, per outlet.
//!
//! Left join of an outlet's aggregate rows against its long-form forecast on
//! (item, day type): unmatched actuals keep a null forecast quantity.
//! Variance = (Qty + WastageQty) - ForecastQty, rounded to 0 decimals, null
//! when either side is unknown; the recommendation is a pure function of
//! (variance, wastage quantity).

use dailyavg_core::{round_dp, AggregateRow, ComparisonRow, DayType, ForecastRow, Recommendation};
use std::collections::HashMap;

/// Compare one outlet's aggregate rows against its forecast rows
pub fn compare_outlet(rows: &[AggregateRow], forecast: &[ForecastRow]) -> Vec<ComparisonRow> {
    let lookup: HashMap<(&str, DayType), f64> = forecast
        .iter()
        .map(|f| ((f.item.as_str(), f.day_type), f.qty))
        .collect();

    rows.iter()
        .map(|row| {
            let forecast_qty = lookup.get(&(row.item.as_str(), row.day_type)).copied();
            let total = row.qty.map(|q| q + row.wastage_qty);
            let variance = match (total, forecast_qty) {
                (Some(t), Some(f)) => Some(round_dp(t - f, 0)),
                _ => None,
            };
            ComparisonRow {
                item: row.item.clone(),
                day_type: row.day_type,
                qty: row.qty,
                wastage_qty: row.wastage_qty,
                total,
                forecast_qty,
                variance,
                recommendation: Recommendation::decide(variance, row.wastage_qty),
            }
        })
        .collect()
}
