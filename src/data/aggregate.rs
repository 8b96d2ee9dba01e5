use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use super::filter::FilteredView;
use super::model::SalesRecord;

// ---------------------------------------------------------------------------
// Query catalog
// ---------------------------------------------------------------------------
//
// Every query is a total function of the filtered view: a view with zero
// records produces empty sequences and zero scalars, never an error. Grouped
// results keep first-encounter order; only the top-N queries re-sort.

/// Entry cap for the top-N queries.
pub const TOP_N: usize = 10;

/// Revenue summed per (month bucket, region) pair. Feeds the monthly trend
/// chart, one line series per region.
pub fn revenue_by_month_region(view: &FilteredView) -> Vec<((String, String), f64)> {
    sum_by(view, |r| (r.month.clone(), r.region.clone()))
}

/// Revenue summed per product category.
pub fn revenue_by_category(view: &FilteredView) -> Vec<(String, f64)> {
    sum_by(view, |r| r.category.clone())
}

/// The ten highest-revenue products, descending; ties keep encounter order.
pub fn top_products(view: &FilteredView) -> Vec<(String, f64)> {
    top_n(sum_by(view, |r| r.product.clone()), TOP_N)
}

/// Revenue summed per customer segment.
pub fn revenue_by_segment(view: &FilteredView) -> Vec<(String, f64)> {
    sum_by(view, |r| r.customer_segment.clone())
}

/// Transaction counts per payment method.
pub fn payment_method_counts(view: &FilteredView) -> Vec<(String, u64)> {
    count_by(view, |r| r.payment_method.clone())
}

/// The ten highest-revenue stores, descending; ties keep encounter order.
pub fn top_stores(view: &FilteredView) -> Vec<(String, f64)> {
    top_n(sum_by(view, |r| r.store.clone()), TOP_N)
}

/// Total revenue KPI. Zero over an empty view.
pub fn total_revenue(view: &FilteredView) -> f64 {
    view.records().map(|r| r.total_revenue).sum()
}

/// Distinct-order-count KPI.
pub fn total_orders(view: &FilteredView) -> u64 {
    let distinct: BTreeSet<&str> = view.records().map(|r| r.order_id.as_str()).collect();
    distinct.len() as u64
}

/// Mean revenue per transaction. `None` over an empty view (the "no data"
/// sentinel the KPI card renders), never a division by zero.
pub fn avg_order_value(view: &FilteredView) -> Option<f64> {
    let n = view.len();
    if n == 0 {
        None
    } else {
        Some(total_revenue(view) / n as f64)
    }
}

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

/// Sum `total_revenue` per key, keys in first-encounter order.
fn sum_by<K, F>(view: &FilteredView, key_of: F) -> Vec<(K, f64)>
where
    K: Clone + Eq + Hash,
    F: Fn(&SalesRecord) -> K,
{
    let mut groups: Vec<(K, f64)> = Vec::new();
    let mut slot: HashMap<K, usize> = HashMap::new();

    for rec in view.records() {
        let key = key_of(rec);
        match slot.get(&key) {
            Some(&i) => groups[i].1 += rec.total_revenue,
            None => {
                slot.insert(key.clone(), groups.len());
                groups.push((key, rec.total_revenue));
            }
        }
    }
    groups
}

/// Count records per key, keys in first-encounter order.
fn count_by<K, F>(view: &FilteredView, key_of: F) -> Vec<(K, u64)>
where
    K: Clone + Eq + Hash,
    F: Fn(&SalesRecord) -> K,
{
    let mut groups: Vec<(K, u64)> = Vec::new();
    let mut slot: HashMap<K, usize> = HashMap::new();

    for rec in view.records() {
        let key = key_of(rec);
        match slot.get(&key) {
            Some(&i) => groups[i].1 += 1,
            None => {
                slot.insert(key.clone(), groups.len());
                groups.push((key, 1));
            }
        }
    }
    groups
}

/// Stable descending sort by value, capped at `n`. Stability is what breaks
/// ties by encounter order.
fn top_n(mut groups: Vec<(String, f64)>, n: usize) -> Vec<(String, f64)> {
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups.truncate(n);
    groups
}

// ---------------------------------------------------------------------------
// DashboardSummary – everything the presentation layer consumes
// ---------------------------------------------------------------------------

/// All KPI scalars and chart series for one recomputation pass.
///
/// `Default` is the all-empty summary shown before a dataset is loaded.
#[derive(Debug, Clone, Default)]
pub struct DashboardSummary {
    pub total_revenue: f64,
    pub total_orders: u64,
    pub avg_order_value: Option<f64>,
    pub revenue_by_month_region: Vec<((String, String), f64)>,
    pub revenue_by_category: Vec<(String, f64)>,
    pub top_products: Vec<(String, f64)>,
    pub revenue_by_segment: Vec<(String, f64)>,
    pub payment_method_counts: Vec<(String, u64)>,
    pub top_stores: Vec<(String, f64)>,
}

impl DashboardSummary {
    /// Run the whole catalog against one filtered view.
    pub fn compute(view: &FilteredView) -> Self {
        DashboardSummary {
            total_revenue: total_revenue(view),
            total_orders: total_orders(view),
            avg_order_value: avg_order_value(view),
            revenue_by_month_region: revenue_by_month_region(view),
            revenue_by_category: revenue_by_category(view),
            top_products: top_products(view),
            revenue_by_segment: revenue_by_segment(view),
            payment_method_counts: payment_method_counts(view),
            top_stores: top_stores(view),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterSpec};
    use crate::data::model::{SalesDataset, SalesRecord};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Row<'a> {
        order: &'a str,
        region: &'a str,
        category: &'a str,
        product: &'a str,
        store: &'a str,
        payment: &'a str,
        date: NaiveDate,
        revenue: f64,
    }

    impl Default for Row<'_> {
        fn default() -> Self {
            Row {
                order: "O1",
                region: "Europe",
                category: "Smartphones",
                product: "Phone X1",
                store: "Store 1",
                payment: "Credit Card",
                date: date(2024, 1, 15),
                revenue: 100.0,
            }
        }
    }

    fn dataset(rows: Vec<Row>) -> SalesDataset {
        SalesDataset::from_records(
            rows.into_iter()
                .map(|r| {
                    SalesRecord::new(
                        r.order.to_string(),
                        r.date,
                        r.region.to_string(),
                        r.category.to_string(),
                        r.product.to_string(),
                        r.store.to_string(),
                        "Consumer".to_string(),
                        r.payment.to_string(),
                        r.revenue,
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn filtered_region_scenario() {
        let ds = dataset(vec![
            Row { order: "O1", region: "A", revenue: 100.0, ..Row::default() },
            Row { order: "O2", region: "A", revenue: 200.0, ..Row::default() },
            Row { order: "O3", region: "B", revenue: 50.0, ..Row::default() },
        ]);
        let mut spec = FilterSpec::select_all(&ds);
        spec.regions = ["A".to_string()].into();
        let view = apply(&ds, &spec);

        assert_eq!(view.len(), 2);
        assert_eq!(total_revenue(&view), 300.0);

        let by_month_region = revenue_by_month_region(&view);
        assert_eq!(by_month_region.len(), 1);
        assert_eq!(by_month_region[0].0 .1, "A");
        assert_eq!(by_month_region[0].1, 300.0);

        let by_category = revenue_by_category(&view);
        assert_eq!(by_category, vec![("Smartphones".to_string(), 300.0)]);
    }

    #[test]
    fn category_totals_add_up_to_revenue_kpi() {
        let ds = dataset(vec![
            Row { order: "O1", category: "Smartphones", revenue: 120.0, ..Row::default() },
            Row { order: "O2", category: "Laptops", revenue: 80.5, ..Row::default() },
            Row { order: "O3", category: "Smartphones", revenue: 19.5, ..Row::default() },
            Row { order: "O4", category: "Audio", revenue: 42.0, ..Row::default() },
        ]);
        let spec = FilterSpec::select_all(&ds);
        let view = apply(&ds, &spec);

        let by_category_sum: f64 = revenue_by_category(&view).iter().map(|(_, v)| v).sum();
        assert!((by_category_sum - total_revenue(&view)).abs() < 1e-9);
    }

    #[test]
    fn grouped_results_keep_encounter_order() {
        let ds = dataset(vec![
            Row { order: "O1", category: "Wearables", ..Row::default() },
            Row { order: "O2", category: "Audio", ..Row::default() },
            Row { order: "O3", category: "Wearables", ..Row::default() },
            Row { order: "O4", category: "Laptops", ..Row::default() },
        ]);
        let spec = FilterSpec::select_all(&ds);
        let view = apply(&ds, &spec);

        let keys: Vec<String> = revenue_by_category(&view).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Wearables", "Audio", "Laptops"]);
    }

    #[test]
    fn top_products_is_capped_and_sorted_descending() {
        let rows: Vec<Row> = (0..13)
            .map(|i| Row {
                product: ["P0", "P1", "P2", "P3", "P4", "P5", "P6", "P7", "P8", "P9", "P10", "P11", "P12"][i],
                revenue: (i as f64 + 1.0) * 10.0,
                ..Row::default()
            })
            .collect();
        let ds = dataset(rows);
        let spec = FilterSpec::select_all(&ds);
        let view = apply(&ds, &spec);

        let top = top_products(&view);
        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0], ("P12".to_string(), 130.0));
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn top_n_ties_keep_encounter_order() {
        let ds = dataset(vec![
            Row { order: "O1", store: "Store B", revenue: 100.0, ..Row::default() },
            Row { order: "O2", store: "Store A", revenue: 100.0, ..Row::default() },
            Row { order: "O3", store: "Store C", revenue: 250.0, ..Row::default() },
        ]);
        let spec = FilterSpec::select_all(&ds);
        let view = apply(&ds, &spec);

        let top = top_stores(&view);
        let names: Vec<&str> = top.iter().map(|(k, _)| k.as_str()).collect();
        // C wins outright; B and A tie and stay in the order they appeared.
        assert_eq!(names, ["Store C", "Store B", "Store A"]);
    }

    #[test]
    fn payment_method_counts_count_records() {
        let ds = dataset(vec![
            Row { order: "O1", payment: "Credit Card", ..Row::default() },
            Row { order: "O2", payment: "PayPal", ..Row::default() },
            Row { order: "O3", payment: "Credit Card", ..Row::default() },
        ]);
        let spec = FilterSpec::select_all(&ds);
        let view = apply(&ds, &spec);

        assert_eq!(
            payment_method_counts(&view),
            vec![("Credit Card".to_string(), 2), ("PayPal".to_string(), 1)]
        );
    }

    #[test]
    fn total_orders_counts_distinct_ids() {
        let ds = dataset(vec![
            Row { order: "O1", revenue: 10.0, ..Row::default() },
            Row { order: "O1", revenue: 20.0, ..Row::default() },
            Row { order: "O2", revenue: 30.0, ..Row::default() },
        ]);
        let spec = FilterSpec::select_all(&ds);
        let view = apply(&ds, &spec);

        assert_eq!(total_orders(&view), 2);
        assert_eq!(avg_order_value(&view), Some(20.0));
    }

    #[test]
    fn empty_view_yields_zeros_and_the_mean_sentinel() {
        let ds = dataset(vec![Row::default()]);
        let mut spec = FilterSpec::select_all(&ds);
        spec.regions.clear();
        let view = apply(&ds, &spec);
        assert!(view.is_empty());

        let summary = DashboardSummary::compute(&view);
        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.avg_order_value, None);
        assert!(summary.revenue_by_month_region.is_empty());
        assert!(summary.revenue_by_category.is_empty());
        assert!(summary.top_products.is_empty());
        assert!(summary.revenue_by_segment.is_empty());
        assert!(summary.payment_method_counts.is_empty());
        assert!(summary.top_stores.is_empty());
    }

    #[test]
    fn single_group_is_a_valid_result() {
        let ds = dataset(vec![Row::default()]);
        let spec = FilterSpec::select_all(&ds);
        let view = apply(&ds, &spec);

        assert_eq!(revenue_by_segment(&view), vec![("Consumer".to_string(), 100.0)]);
        assert_eq!(top_products(&view).len(), 1);
    }
}
