use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Line palette: one distinct colour per entity
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
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Maps entity names to distinct line colours.
#[derive(Debug, Clone, Default)]
pub struct EntityColors {
    mapping: BTreeMap<String, Color32>,
}

impl EntityColors {
    /// Assign colours to `names` in iteration order.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        let mapping = names
            .iter()
            .zip(generate_palette(names.len()))
            .map(|(name, c)| (name.to_string(), c))
            .collect();
        EntityColors { mapping }
    }

    pub fn color_for(&self, name: &str) -> Color32 {
        self.mapping.get(name).copied().unwrap_or(Color32::LIGHT_BLUE)
    }
}

// ---------------------------------------------------------------------------
// Continuous scale for the map (Viridis)
// ---------------------------------------------------------------------------

const VIRIDIS: [(u8, u8, u8); 5] = [
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];

/// Regions without a value.
pub const MISSING_COLOR: Color32 = Color32::from_rgb(0xc8, 0xc8, 0xc8);

/// Sample the Viridis gradient at `t` in `[0, 1]`.
pub fn viridis(t: f32) -> Color32 {
    let pos = t.clamp(0.0, 1.0) * (VIRIDIS.len() - 1) as f32;
    let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let (a, b) = (linear(VIRIDIS[i]), linear(VIRIDIS[i + 1]));
    to_color32(Srgb::from_linear(a.mix(b, pos - i as f32)))
}

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::<u8>::new(r, g, b).into_format::<f32>().into_linear()
}

/// Linear mapping of `[min, max]` onto the Viridis gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousScale {
    pub min: f64,
    pub max: f64,
}

impl ContinuousScale {
    pub fn new(min: f64, max: f64) -> Self {
        ContinuousScale { min, max }
    }

    pub fn color_for(&self, value: Option<f64>) -> Color32 {
        let Some(v) = value else {
            return MISSING_COLOR;
        };
        let span = self.max - self.min;
        let t = if span.abs() < f64::EPSILON {
            0.5
        } else {
            (v - self.min) / span
        };
        viridis(t as f32)
    }
}

/// Perceived brightness in `[0, 1]`, for picking a readable label colour.
pub fn luminance(c: Color32) -> f32 {
    (0.299 * c.r() as f32 + 0.587 * c.g() as f32 + 0.114 * c.b() as f32) / 255.0
}
