//! Ranker: per-outlet top-10 and bottom-10 items by overall average quantity.
//!
//! A pure read of the aggregate table. Ties are broken on item name
//! ascending so the selection is deterministic.

use dailyavg_core::{AggregateRow, ItemTotal, RankSet};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// How many items to highlight at each end
pub const RANK_DEPTH: usize = 10;

/// Mean of non-null quantity across an item's day-type rows.
///
/// Items whose quantity is null on every day type carry no signal and are
/// left out of the ranking entirely.
pub fn item_totals(rows: &[AggregateRow]) -> Vec<ItemTotal> {
    let mut acc: BTreeMap<(String, String), (f64, u32)> = BTreeMap::new();
    for row in rows {
        if let Some(qty) = row.qty {
            let entry = acc.entry((row.outlet.clone(), row.item.clone())).or_default();
            entry.0 += qty;
            entry.1 += 1;
        }
    }
    acc.into_iter()
        .map(|((outlet, item), (sum, count))| ItemTotal {
            outlet,
            item,
            total_avg_qty: sum / f64::from(count),
        })
        .collect()
}

/// Per-outlet highlight sets
pub fn rank(rows: &[AggregateRow]) -> HashMap<String, RankSet> {
    let mut by_outlet: BTreeMap<String, Vec<ItemTotal>> = BTreeMap::new();
    for total in item_totals(rows) {
        by_outlet.entry(total.outlet.clone()).or_default().push(total);
    }

    let mut ranks = HashMap::new();
    for (outlet, mut totals) in by_outlet {
        let mut set = RankSet::default();

        totals.sort_by(|a, b| {
            b.total_avg_qty
                .partial_cmp(&a.total_avg_qty)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item.cmp(&b.item))
        });
        set.top = totals
            .iter()
            .take(RANK_DEPTH)
            .map(|t| t.item.clone())
            .collect();

        totals.sort_by(|a, b| {
            a.total_avg_qty
                .partial_cmp(&b.total_avg_qty)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item.cmp(&b.item))
        });
        set.bottom = totals
            .iter()
            .take(RANK_DEPTH)
            .map(|t| t.item.clone())
            .collect();

        ranks.insert(outlet, set);
    }
    ranks
}
