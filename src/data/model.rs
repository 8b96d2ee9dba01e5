use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Column names of the external tabular formats
// ---------------------------------------------------------------------------

/// Column names shared by the CSV/JSON/Parquet loaders and the sample
/// generator. The schema is fixed; there is no runtime column discovery.
pub mod columns {
    pub const ORDER_ID: &str = "OrderID";
    pub const DATE: &str = "Date";
    pub const REGION: &str = "Region";
    pub const CATEGORY: &str = "Category";
    pub const PRODUCT: &str = "Product";
    pub const STORE: &str = "Store";
    pub const CUSTOMER_SEGMENT: &str = "CustomerSegment";
    pub const PAYMENT_METHOD: &str = "PaymentMethod";
    pub const TOTAL_REVENUE: &str = "TotalRevenue";

    /// Every required column, in canonical order.
    pub const ALL: [&str; 9] = [
        ORDER_ID,
        DATE,
        REGION,
        CATEGORY,
        PRODUCT,
        STORE,
        CUSTOMER_SEGMENT,
        PAYMENT_METHOD,
        TOTAL_REVENUE,
    ];
}

// ---------------------------------------------------------------------------
// Calendar derivations
// ---------------------------------------------------------------------------

/// Year-month bucket of a date, e.g. `2024-03`.
pub fn month_bucket(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Calendar quarter (1–4) of a date: months 1–3 → 1, 4–6 → 2, and so on.
pub fn quarter_of(date: NaiveDate) -> u8 {
    ((date.month() + 2) / 3) as u8
}

// ---------------------------------------------------------------------------
// SalesRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single sales transaction (one row of the source table).
///
/// `month`, `year` and `quarter` are derived from `date` once in
/// [`SalesRecord::new`] and never diverge from it.
#[derive(Debug, Clone)]
pub struct SalesRecord {
    pub order_id: String,
    pub date: NaiveDate,
    pub region: String,
    pub category: String,
    pub product: String,
    pub store: String,
    pub customer_segment: String,
    pub payment_method: String,
    pub total_revenue: f64,
    /// Year-month bucket, `YYYY-MM`.
    pub month: String,
    pub year: i32,
    /// Calendar quarter, 1–4.
    pub quarter: u8,
}

impl SalesRecord {
    /// Build a record, computing the calendar fields from `date`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_id: String,
        date: NaiveDate,
        region: String,
        category: String,
        product: String,
        store: String,
        customer_segment: String,
        payment_method: String,
        total_revenue: f64,
    ) -> Self {
        SalesRecord {
            order_id,
            month: month_bucket(date),
            year: date.year(),
            quarter: quarter_of(date),
            date,
            region,
            category,
            product,
            store,
            customer_segment,
            payment_method,
            total_revenue,
        }
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed value indexes for the filter UI.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    /// All transactions (rows), in source order.
    pub records: Vec<SalesRecord>,
    /// Unique values of each filterable field, sorted.
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub segments: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    pub quarters: BTreeSet<u8>,
    /// Earliest and latest transaction date; `None` for an empty dataset.
    pub date_span: Option<(NaiveDate, NaiveDate)>,
}

impl SalesDataset {
    /// Build the value indexes from the loaded records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut ds = SalesDataset {
            records,
            ..SalesDataset::default()
        };

        let mut span: Option<(NaiveDate, NaiveDate)> = None;
        for rec in &ds.records {
            ds.regions.insert(rec.region.clone());
            ds.categories.insert(rec.category.clone());
            ds.segments.insert(rec.customer_segment.clone());
            ds.years.insert(rec.year);
            ds.quarters.insert(rec.quarter);

            span = Some(match span {
                None => (rec.date, rec.date),
                Some((lo, hi)) => (lo.min(rec.date), hi.max(rec.date)),
            });
        }
        ds.date_span = span;
        ds
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(region: &str, date_: NaiveDate, revenue: f64) -> SalesRecord {
        SalesRecord::new(
            format!("ORD-{region}-{date_}"),
            date_,
            region.to_string(),
            "Smartphones".to_string(),
            "Phone X1".to_string(),
            "Store 1".to_string(),
            "Consumer".to_string(),
            "Credit Card".to_string(),
            revenue,
        )
    }

    #[test]
    fn quarter_follows_calendar_month() {
        assert_eq!(quarter_of(date(2024, 1, 15)), 1);
        assert_eq!(quarter_of(date(2024, 3, 31)), 1);
        assert_eq!(quarter_of(date(2024, 4, 1)), 2);
        assert_eq!(quarter_of(date(2024, 6, 30)), 2);
        assert_eq!(quarter_of(date(2024, 7, 1)), 3);
        assert_eq!(quarter_of(date(2024, 12, 25)), 4);
    }

    #[test]
    fn month_bucket_is_zero_padded() {
        assert_eq!(month_bucket(date(2024, 3, 5)), "2024-03");
        assert_eq!(month_bucket(date(2024, 11, 30)), "2024-11");
    }

    #[test]
    fn new_populates_calendar_fields() {
        let rec = record("Europe", date(2024, 4, 17), 999.0);
        assert_eq!(rec.month, "2024-04");
        assert_eq!(rec.year, 2024);
        assert_eq!(rec.quarter, 2);
    }

    #[test]
    fn from_records_builds_value_indexes() {
        let ds = SalesDataset::from_records(vec![
            record("Europe", date(2024, 1, 10), 100.0),
            record("Asia Pacific", date(2024, 5, 2), 200.0),
            record("Europe", date(2023, 12, 24), 50.0),
        ]);

        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.regions.iter().collect::<Vec<_>>(),
            ["Asia Pacific", "Europe"]
        );
        assert_eq!(ds.years.iter().copied().collect::<Vec<_>>(), [2023, 2024]);
        assert_eq!(ds.quarters.iter().copied().collect::<Vec<_>>(), [1, 2, 4]);
        assert_eq!(ds.date_span, Some((date(2023, 12, 24), date(2024, 5, 2))));
    }

    #[test]
    fn empty_dataset_has_no_span() {
        let ds = SalesDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.date_span.is_none());
        assert!(ds.regions.is_empty());
    }
}
