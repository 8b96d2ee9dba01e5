use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: region → Color32
// ---------------------------------------------------------------------------

/// Maps region names to stable, distinct colours so the trend chart's line
/// series keep their colour across filter changes.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl Default for ColorMap {
    fn default() -> Self {
        ColorMap {
            mapping: BTreeMap::new(),
            default_color: Color32::GRAY,
        }
    }
}

impl ColorMap {
    /// Build a colour map over the dataset's regions.
    pub fn new(regions: &BTreeSet<String>) -> Self {
        let palette = generate_palette(regions.len());
        let mapping: BTreeMap<String, Color32> = regions
            .iter()
            .zip(palette.into_iter())
            .map(|(r, c): (&String, Color32)| (r.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a region.
    pub fn color_for(&self, region: &str) -> Color32 {
        self.mapping
            .get(region)
            .copied()
            .unwrap_or(self.default_color)
    }
}
