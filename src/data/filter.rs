use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{SalesDataset, SalesRecord};

// ---------------------------------------------------------------------------
// FilterSpec: the complete set of constraints for one recomputation pass
// ---------------------------------------------------------------------------

/// Per-field acceptance sets plus an inclusive date range.
///
/// Semantics, per field:
/// * A record matches only if its value is in the field's set (exact
///   equality, no pattern matching).
/// * An empty set means "nothing selected" and therefore matches no record.
/// * All fields combine conjunctively, together with the date range.
///
/// `start`/`end` of `None` mean unbounded on that side (the UI may supply a
/// partial range). A reversed range (`start > end`) simply matches nothing;
/// that is decided behavior, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub segments: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    pub quarters: BTreeSet<u8>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl FilterSpec {
    /// The everything-selected spec for a dataset: every unique value of each
    /// field accepted, date range spanning the whole dataset. This is the
    /// state the filter UI starts from.
    pub fn select_all(dataset: &SalesDataset) -> Self {
        FilterSpec {
            regions: dataset.regions.clone(),
            categories: dataset.categories.clone(),
            segments: dataset.segments.clone(),
            years: dataset.years.clone(),
            quarters: dataset.quarters.clone(),
            start: dataset.date_span.map(|(lo, _)| lo),
            end: dataset.date_span.map(|(_, hi)| hi),
        }
    }

    /// Whether a single record satisfies every constraint.
    pub fn matches(&self, rec: &SalesRecord) -> bool {
        self.regions.contains(&rec.region)
            && self.categories.contains(&rec.category)
            && self.segments.contains(&rec.customer_segment)
            && self.years.contains(&rec.year)
            && self.quarters.contains(&rec.quarter)
            && self.start.map_or(true, |s| rec.date >= s)
            && self.end.map_or(true, |e| rec.date <= e)
    }
}

// ---------------------------------------------------------------------------
// FilteredView: the matching subset, recomputed per interaction
// ---------------------------------------------------------------------------

/// Indices of records that pass all active filters, in dataset order.
pub fn filtered_indices(dataset: &SalesDataset, spec: &FilterSpec) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| spec.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Borrowed view of the records satisfying a [`FilterSpec`].
///
/// An empty view is a valid result: aggregation over it yields empty/zero
/// outputs, never an error.
pub struct FilteredView<'a> {
    dataset: &'a SalesDataset,
    indices: Vec<usize>,
}

/// Evaluate a spec against the dataset. Total: never fails.
pub fn apply<'a>(dataset: &'a SalesDataset, spec: &FilterSpec) -> FilteredView<'a> {
    FilteredView {
        dataset,
        indices: filtered_indices(dataset, spec),
    }
}

impl<'a> FilteredView<'a> {
    /// Iterate the matching records in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        self.indices.iter().map(|&i| &self.dataset.records[i])
    }

    /// Number of matching records.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no record matched.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The matching indices, for callers that cache them.
    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SalesRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(order: &str, region: &str, d: NaiveDate, revenue: f64) -> SalesRecord {
        SalesRecord::new(
            order.to_string(),
            d,
            region.to_string(),
            "Smartphones".to_string(),
            "Phone X1".to_string(),
            "Store 1".to_string(),
            "Consumer".to_string(),
            "Credit Card".to_string(),
            revenue,
        )
    }

    fn sample_dataset() -> SalesDataset {
        SalesDataset::from_records(vec![
            record("O1", "North America", date(2024, 1, 10), 100.0),
            record("O2", "North America", date(2024, 4, 2), 200.0),
            record("O3", "Europe", date(2024, 7, 19), 50.0),
            record("O4", "Europe", date(2023, 11, 5), 75.0),
        ])
    }

    #[test]
    fn select_all_matches_every_record() {
        let ds = sample_dataset();
        let spec = FilterSpec::select_all(&ds);
        assert_eq!(apply(&ds, &spec).len(), ds.len());
    }

    #[test]
    fn one_empty_acceptance_set_excludes_everything() {
        let ds = sample_dataset();

        for clear in 0..5usize {
            let mut spec = FilterSpec::select_all(&ds);
            match clear {
                0 => spec.regions.clear(),
                1 => spec.categories.clear(),
                2 => spec.segments.clear(),
                3 => spec.years.clear(),
                _ => spec.quarters.clear(),
            }
            assert!(apply(&ds, &spec).is_empty(), "cleared field {clear}");
        }
    }

    #[test]
    fn membership_is_exact_equality() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::select_all(&ds);
        spec.regions = ["North".to_string()].into();
        // "North" is not "North America" – no substring or prefix matching.
        assert!(apply(&ds, &spec).is_empty());
    }

    #[test]
    fn region_filter_keeps_only_matching_records() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::select_all(&ds);
        spec.regions = ["Europe".to_string()].into();

        let view = apply(&ds, &spec);
        assert_eq!(view.len(), 2);
        assert!(view.records().all(|r| r.region == "Europe"));
    }

    #[test]
    fn year_and_quarter_filters_apply() {
        let ds = sample_dataset();

        let mut spec = FilterSpec::select_all(&ds);
        spec.years = [2023].into();
        assert_eq!(apply(&ds, &spec).len(), 1);

        let mut spec = FilterSpec::select_all(&ds);
        spec.quarters = [1, 2].into();
        assert_eq!(apply(&ds, &spec).len(), 2);
    }

    #[test]
    fn date_range_is_inclusive() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::select_all(&ds);
        spec.start = Some(date(2024, 1, 10));
        spec.end = Some(date(2024, 4, 2));

        let view = apply(&ds, &spec);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn absent_bounds_mean_unbounded() {
        let ds = sample_dataset();

        let mut spec = FilterSpec::select_all(&ds);
        spec.start = None;
        spec.end = Some(date(2024, 1, 10));
        assert_eq!(apply(&ds, &spec).len(), 2); // 2023-11-05 and 2024-01-10

        let mut spec = FilterSpec::select_all(&ds);
        spec.start = Some(date(2024, 7, 19));
        spec.end = None;
        assert_eq!(apply(&ds, &spec).len(), 1);
    }

    #[test]
    fn reversed_range_yields_empty_view() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::select_all(&ds);
        spec.start = Some(date(2024, 6, 1));
        spec.end = Some(date(2024, 1, 1));

        assert!(apply(&ds, &spec).is_empty());
    }

    #[test]
    fn every_view_record_satisfies_the_filter() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::select_all(&ds);
        spec.regions = ["North America".to_string()].into();
        spec.quarters = [1, 2].into();
        spec.end = Some(date(2024, 3, 1));

        let view = apply(&ds, &spec);
        assert!(view.records().all(|r| spec.matches(r)));
    }

    #[test]
    fn reapplying_a_spec_to_its_view_is_identity() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::select_all(&ds);
        spec.regions = ["Europe".to_string()].into();

        let first: Vec<SalesRecord> = apply(&ds, &spec).records().cloned().collect();
        let survivors = SalesDataset::from_records(first.clone());
        let second = apply(&survivors, &spec);

        assert_eq!(second.len(), first.len());
    }

    #[test]
    fn empty_dataset_yields_empty_view() {
        let ds = SalesDataset::from_records(Vec::new());
        let spec = FilterSpec::select_all(&ds);
        assert!(apply(&ds, &spec).is_empty());
    }
}
