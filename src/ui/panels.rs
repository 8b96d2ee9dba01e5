use std::collections::BTreeSet;
use std::fmt::Display;

use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::FilterSpec;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the value indexes so the filter sets can be mutated in the loop.
    let regions = dataset.regions.clone();
    let categories = dataset.categories.clone();
    let segments = dataset.segments.clone();
    let years = dataset.years.clone();
    let quarters = dataset.quarters.clone();
    let date_span = dataset.date_span;

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            changed |= value_filter_section(ui, "Region", &regions, &mut state.filters.regions);
            changed |=
                value_filter_section(ui, "Category", &categories, &mut state.filters.categories);
            changed |= value_filter_section(
                ui,
                "Customer Segment",
                &segments,
                &mut state.filters.segments,
            );
            changed |= value_filter_section(ui, "Year", &years, &mut state.filters.years);
            changed |= value_filter_section(ui, "Quarter", &quarters, &mut state.filters.quarters);

            ui.separator();
            changed |= date_range_section(ui, date_span, &mut state.filters);
        });

    // Recompute the view and summary only when something actually changed.
    if changed {
        state.refilter();
    }
}

/// One collapsible checkbox section for a filterable field, with All/None
/// shortcuts and a selected/total count in the header. Returns whether any
/// selection changed.
fn value_filter_section<T>(
    ui: &mut Ui,
    label: &str,
    all_values: &BTreeSet<T>,
    selected: &mut BTreeSet<T>,
) -> bool
where
    T: Ord + Clone + Display,
{
    let mut changed = false;
    let header_text = format!("{label}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(label)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    *selected = all_values.clone();
                    changed = true;
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                    changed = true;
                }
            });

            for value in all_values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value.to_string()).changed() {
                    if checked {
                        selected.insert(value.clone());
                    } else {
                        selected.remove(value);
                    }
                    changed = true;
                }
            }
        });

    changed
}

/// Inclusive date-range pickers plus a reset to the dataset span. Returns
/// whether the range changed.
fn date_range_section(
    ui: &mut Ui,
    span: Option<(NaiveDate, NaiveDate)>,
    filters: &mut FilterSpec,
) -> bool {
    let Some((lo, hi)) = span else {
        return false;
    };
    let mut changed = false;

    ui.strong("Date Range");

    let mut start = filters.start.unwrap_or(lo);
    let mut end = filters.end.unwrap_or(hi);

    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        if ui
            .add(DatePickerButton::new(&mut start).id_salt("date_start"))
            .changed()
        {
            filters.start = Some(start);
            changed = true;
        }
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        if ui
            .add(DatePickerButton::new(&mut end).id_salt("date_end"))
            .changed()
        {
            filters.end = Some(end);
            changed = true;
        }
    });

    // A reversed range is allowed; it just matches nothing.
    if start > end {
        ui.label(RichText::new("Start is after end – no records match.").color(Color32::YELLOW));
    }

    if ui.small_button("Reset range").clicked() {
        filters.start = Some(lo);
        filters.end = Some(hi);
        changed = true;
    }

    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} matching filters",
                ds.len(),
                state.visible.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
