use std::collections::HashMap;

use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::color::{generate_palette, ColorMap};
use crate::data::aggregate::DashboardSummary;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dashboard (central panel): KPI cards + chart grid
// ---------------------------------------------------------------------------

/// Render the KPI cards and all six charts from the current summary.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a sales file to view the dashboard  (File → Open…)");
        });
        return;
    }

    let summary = &state.summary;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            kpi_row(ui, summary);

            if state.visible.is_empty() {
                ui.add_space(8.0);
                ui.label(
                    RichText::new("No records match the current filters.")
                        .color(Color32::YELLOW),
                );
            }
            ui.separator();

            ui.columns(2, |cols: &mut [Ui]| {
                monthly_trend_chart(&mut cols[0], summary, &state.color_map);
                bar_chart(
                    &mut cols[1],
                    "revenue_by_category",
                    "Revenue by Category",
                    &summary.revenue_by_category,
                    "Revenue ($)",
                );
            });

            ui.columns(2, |cols: &mut [Ui]| {
                bar_chart(
                    &mut cols[0],
                    "top_products",
                    "Top 10 Products by Revenue",
                    &summary.top_products,
                    "Revenue ($)",
                );
                bar_chart(
                    &mut cols[1],
                    "revenue_by_segment",
                    "Revenue by Customer Segment",
                    &summary.revenue_by_segment,
                    "Revenue ($)",
                );
            });

            let payments: Vec<(String, f64)> = summary
                .payment_method_counts
                .iter()
                .map(|(k, v)| (k.clone(), *v as f64))
                .collect();

            ui.columns(2, |cols: &mut [Ui]| {
                bar_chart(
                    &mut cols[0],
                    "payment_methods",
                    "Payment Method Distribution",
                    &payments,
                    "Transactions",
                );
                bar_chart(
                    &mut cols[1],
                    "top_stores",
                    "Top 10 Stores by Revenue",
                    &summary.top_stores,
                    "Revenue ($)",
                );
            });
        });
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

fn kpi_row(ui: &mut Ui, summary: &DashboardSummary) {
    ui.columns(3, |cols: &mut [Ui]| {
        kpi_card(
            &mut cols[0],
            "TOTAL REVENUE",
            format!("${}", format_thousands(summary.total_revenue)),
        );
        kpi_card(
            &mut cols[1],
            "TOTAL ORDERS",
            format_thousands(summary.total_orders as f64),
        );
        kpi_card(
            &mut cols[2],
            "AVG ORDER VALUE",
            match summary.avg_order_value {
                Some(v) => format!("${}", format_thousands(v)),
                // The mean of an empty view is undefined, not zero.
                None => "no data".to_string(),
            },
        );
    });
}

fn kpi_card(ui: &mut Ui, title: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(title).small().strong());
            ui.label(RichText::new(value).heading());
        });
    });
}

/// `1234567.8` → `"1,234,568"`. KPI cards round to whole units.
fn format_thousands(value: f64) -> String {
    let digits = (value.round() as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Monthly revenue trend – one line series per region
// ---------------------------------------------------------------------------

fn monthly_trend_chart(ui: &mut Ui, summary: &DashboardSummary, colors: &ColorMap) {
    ui.strong("Monthly Revenue Trend by Region");

    // "YYYY-MM" buckets sort chronologically as strings.
    let mut months: Vec<&str> = summary
        .revenue_by_month_region
        .iter()
        .map(|((m, _), _)| m.as_str())
        .collect();
    months.sort_unstable();
    months.dedup();

    let month_index: HashMap<&str, usize> =
        months.iter().enumerate().map(|(i, m)| (*m, i)).collect();

    // region → points, x = month position on the axis
    let mut series: Vec<(&str, Vec<[f64; 2]>)> = Vec::new();
    for ((month, region), revenue) in &summary.revenue_by_month_region {
        let x = month_index.get(month.as_str()).copied().unwrap_or(0) as f64;
        match series.iter_mut().find(|(r, _)| *r == region.as_str()) {
            Some((_, points)) => points.push([x, *revenue]),
            None => series.push((region.as_str(), vec![[x, *revenue]])),
        }
    }
    for (_, points) in &mut series {
        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    }

    let labels: Vec<String> = months.iter().map(|m| m.to_string()).collect();

    Plot::new("monthly_trend")
        .height(280.0)
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| axis_label(&labels, mark))
        .y_axis_label("Revenue ($)")
        .show(ui, |plot_ui| {
            for (region, points) in series {
                let line = Line::new(PlotPoints::from(points))
                    .name(region)
                    .color(colors.color_for(region))
                    .width(2.0);
                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Generic bar chart over (label, value) rows
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, id: &str, title: &str, rows: &[(String, f64)], y_label: &str) {
    ui.strong(title);

    let palette = generate_palette(rows.len());
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new(i as f64, *value)
                .width(0.6)
                .name(label)
                .fill(palette[i])
        })
        .collect();

    let labels: Vec<String> = rows.iter().map(|(k, _)| k.clone()).collect();

    Plot::new(id)
        .height(240.0)
        .x_axis_formatter(move |mark, _range| axis_label(&labels, mark))
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Map whole-number grid marks back to category labels; fractional marks and
/// out-of-range positions get no label.
fn axis_label(labels: &[String], mark: GridMark) -> String {
    let rounded = mark.value.round();
    if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}
