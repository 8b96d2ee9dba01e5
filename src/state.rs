use std::path::Path;

use crate::color::ColorMap;
use crate::data::aggregate::DashboardSummary;
use crate::data::filter::{apply, FilterSpec};
use crate::data::loader;
use crate::data::model::SalesDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset is read-only once loaded; every filter interaction goes
/// through [`AppState::refilter`], which recomputes the visible subset and
/// the whole dashboard summary in one pass.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<SalesDataset>,

    /// Current filter selections.
    pub filters: FilterSpec,

    /// Indices of records passing the current filters (cached).
    pub visible: Vec<usize>,

    /// Aggregation outputs for the current filters.
    pub summary: DashboardSummary,

    /// Region → colour for the trend chart series.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset: select every filter value, colour the
    /// regions, and compute the initial summary.
    pub fn set_dataset(&mut self, dataset: SalesDataset) {
        self.filters = FilterSpec::select_all(&dataset);
        self.color_map = ColorMap::new(&dataset.regions);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered view and all aggregations. Called on every
    /// filter change; idempotent and side-effect-free beyond this state.
    pub fn refilter(&mut self) {
        match &self.dataset {
            Some(ds) => {
                let view = apply(ds, &self.filters);
                self.summary = DashboardSummary::compute(&view);
                self.visible = view.into_indices();
                log::debug!(
                    "filters matched {} of {} records",
                    self.visible.len(),
                    ds.len()
                );
            }
            None => {
                self.visible.clear();
                self.summary = DashboardSummary::default();
            }
        }
    }

    /// Load a dataset file. On failure the current dataset is kept, the
    /// error is logged and surfaced through the status line.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} sales records from {}",
                    dataset.len(),
                    path.display()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
