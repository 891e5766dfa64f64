//! Aggregator: grouped null-skipping means over reconciled records.
//!
//! Groups by (outlet, item, day type). A missing value is excluded from its
//! measure's mean rather than counted as zero; a group where every value for
//! a measure is missing yields a null mean. Records whose business date
//! never parsed have no day type and are excluded with an explicit count.

use dailyavg_core::{round_dp, AggregateRow, DayType, NamingConfig, ReconciledRecord};
use std::collections::BTreeMap;

/// Aggregation result plus the undated-row exclusion count
#[derive(Clone, Debug)]
pub struct AggregateOutput {
    pub rows: Vec<AggregateRow>,
    pub undated_rows: usize,
}

/// Null-skipping mean accumulator
#[derive(Default)]
struct MeasureAcc {
    sum: f64,
    count: u32,
}

impl MeasureAcc {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

#[derive(Default)]
struct GroupAcc {
    sales: MeasureAcc,
    qty: MeasureAcc,
    wastage_sales: MeasureAcc,
    wastage_qty: MeasureAcc,
}

/// Compute the long-form report table.
///
/// Output rows carry display names (code-stripping transforms applied),
/// rounded measures (0 decimals for quantities, 2 for sales), the
/// wastage-quantity null-to-zero default, and the fixed sort order:
/// outlet asc, item asc, day type in report order.
pub fn aggregate(records: &[ReconciledRecord], naming: &NamingConfig) -> AggregateOutput {
    let mut groups: BTreeMap<(String, String, DayType), GroupAcc> = BTreeMap::new();
    let mut undated_rows = 0usize;

    for rec in records {
        let Some(day_type) = rec.day_type else {
            undated_rows += 1;
            continue;
        };
        let group = groups
            .entry((rec.outlet.clone(), rec.item.clone(), day_type))
            .or_default();
        group.sales.push(rec.sales);
        group.qty.push(rec.qty);
        group.wastage_sales.push(rec.wastage_sales);
        group.wastage_qty.push(rec.wastage_qty);
    }

    if undated_rows > 0 {
        tracing::warn!(
            undated_rows,
            "records excluded from aggregation: business date did not parse"
        );
    }

    let mut rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|((outlet, item, day_type), acc)| AggregateRow {
            outlet: naming.strip_outlet(&outlet),
            item: naming.strip_item(&item),
            day_type,
            qty: acc.qty.mean().map(|v| round_dp(v, 0)),
            wastage_qty: acc
                .wastage_qty
                .mean()
                .map(|v| round_dp(v, 0))
                .unwrap_or(0.0),
            sales: acc.sales.mean().map(|v| round_dp(v, 2)),
            wastage_sales: acc.wastage_sales.mean().map(|v| round_dp(v, 2)),
        })
        .collect();

    // The stripping transforms can reorder, so sort on display values.
    rows.sort_by(|a, b| {
        a.outlet
            .cmp(&b.outlet)
            .then_with(|| a.item.cmp(&b.item))
            .then_with(|| a.day_type.cmp(&b.day_type))
    });

    AggregateOutput { rows, undated_rows }
}
