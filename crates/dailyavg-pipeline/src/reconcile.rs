//! Reconciler: outer join of sales and wastage records.
//!
//! Every (outlet, item, business date) key present in either source appears
//! exactly once in the output, with the non-matching side's measures `None`.
//! The join runs over an ordered map so output order is deterministic.

use chrono::NaiveDate;
use dailyavg_core::{DayType, NormalizedRecord, ReconciledRecord};
use std::collections::BTreeMap;

/// Date layouts the POS exports have been seen to use
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%d/%m/%Y", "%m/%d/%Y"];

/// Parse a business-date string; `None` marks the record as undated.
pub fn parse_business_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Full outer join on (outlet, item, business date), deriving the day type.
///
/// An unparseable business date yields `day_type: None`; the record is kept
/// here and excluded (with a count) by the aggregator.
pub fn reconcile(
    sales: &[NormalizedRecord],
    wastage: &[NormalizedRecord],
) -> Vec<ReconciledRecord> {
    let mut joined: BTreeMap<(String, String, String), ReconciledRecord> = BTreeMap::new();

    let blank = |rec: &NormalizedRecord| ReconciledRecord {
        outlet: rec.outlet.clone(),
        item: rec.item.clone(),
        business_date: rec.business_date.clone(),
        day_type: parse_business_date(&rec.business_date).map(DayType::classify),
        sales: None,
        qty: None,
        wastage_sales: None,
        wastage_qty: None,
    };
    let key = |rec: &NormalizedRecord| {
        (
            rec.outlet.clone(),
            rec.item.clone(),
            rec.business_date.clone(),
        )
    };

    for rec in sales {
        let entry = joined.entry(key(rec)).or_insert_with(|| blank(rec));
        entry.sales = Some(rec.net_sales);
        entry.qty = Some(rec.item_qty);
    }
    for rec in wastage {
        let entry = joined.entry(key(rec)).or_insert_with(|| blank(rec));
        entry.wastage_sales = Some(rec.net_sales);
        entry.wastage_qty = Some(rec.item_qty);
    }

    joined.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(outlet: &str, item: &str, date: &str, sales: f64, qty: f64) -> NormalizedRecord {
        NormalizedRecord {
            outlet: outlet.into(),
            item: item.into(),
            business_date: date.into(),
            net_sales: sales,
            item_qty: qty,
        }
    }

    #[test]
    fn outer_join_is_complete_without_duplication() {
        let sales = vec![
            record("A", "X", "2026-08-24", 10.0, 5.0),
            record("A", "X", "2026-08-25", 12.0, 6.0),
        ];
        let wastage = vec![
            record("A", "X", "2026-08-25", 2.0, 1.0),
            record("A", "Y", "2026-08-25", 3.0, 2.0),
        ];
        let joined = reconcile(&sales, &wastage);

        // Three distinct keys across both sources, each exactly once.
        assert_eq!(joined.len(), 3);

        let sales_only = joined
            .iter()
            .find(|r| r.business_date == "2026-08-24")
            .unwrap();
        assert_eq!(sales_only.qty, Some(5.0));
        assert_eq!(sales_only.wastage_qty, None);
        assert_eq!(sales_only.wastage_sales, None);

        let matched = joined
            .iter()
            .find(|r| r.item == "X" && r.business_date == "2026-08-25")
            .unwrap();
        assert_eq!(matched.qty, Some(6.0));
        assert_eq!(matched.wastage_qty, Some(1.0));

        let wastage_only = joined.iter().find(|r| r.item == "Y").unwrap();
        assert_eq!(wastage_only.sales, None);
        assert_eq!(wastage_only.wastage_sales, Some(3.0));
    }

    #[test]
    fn day_type_derivation() {
        let joined = reconcile(&[record("A", "X", "2026-08-29", 1.0, 1.0)], &[]);
        assert_eq!(joined[0].day_type, Some(DayType::Saturday));
    }

    #[test]
    fn unparseable_date_yields_none_day_type() {
        let joined = reconcile(&[record("A", "X", "not a date", 1.0, 1.0)], &[]);
        assert_eq!(joined[0].day_type, None);
    }

    #[test]
    fn slash_formats_parse() {
        assert_eq!(
            parse_business_date("24/08/2026"),
            NaiveDate::from_ymd_opt(2026, 8, 24)
        );
        assert_eq!(
            parse_business_date("2026-08-24 00:00:00"),
            NaiveDate::from_ymd_opt(2026, 8, 24)
        );
    }
}
