use eframe::egui::{self, Align2, Color32, FontId, Sense, Ui, vec2};

use data_tracker::data::MapLayer;

use crate::color::{ContinuousScale, MISSING_COLOR, luminance, viridis};
use crate::ui::table::format_value;

const TILE: egui::Vec2 = egui::Vec2::new(46.0, 24.0);
const COLOR_BAR_STEPS: usize = 64;

// ---------------------------------------------------------------------------
// Choropleth (one tile per country code)
// ---------------------------------------------------------------------------

/// Render the latest value of every country, coloured on a continuous scale.
pub fn choropleth(ui: &mut Ui, layer: Option<&MapLayer>) {
    ui.heading("Choropleth Map - Latest Global Data");

    let Some(layer) = layer else {
        ui.label("No map data.");
        return;
    };
    ui.strong(&layer.title);

    let scale = layer.range.map(|(min, max)| ContinuousScale::new(min, max));
    match scale {
        Some(scale) => color_bar(ui, &scale),
        None => {
            ui.label("No country has a recorded value for this metric.");
        }
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.spacing_mut().item_spacing = vec2(2.0, 2.0);
        for cell in &layer.cells {
            let fill = scale.map_or(MISSING_COLOR, |s| s.color_for(cell.value));
            let text_color = if luminance(fill) > 0.5 {
                Color32::BLACK
            } else {
                Color32::WHITE
            };

            let (rect, response) = ui.allocate_exact_size(TILE, Sense::hover());
            let painter = ui.painter();
            painter.rect_filled(rect, 2.0, fill);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                &cell.iso_code,
                FontId::monospace(11.0),
                text_color,
            );
            response.on_hover_text(format!(
                "{}\n{}: {}",
                cell.location,
                layer.metric.label(),
                match cell.value {
                    Some(_) => format_value(cell.value),
                    None => "no data".to_string(),
                }
            ));
        }
    });
}

fn color_bar(ui: &mut Ui, scale: &ContinuousScale) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format_value(Some(scale.min)));
        let (rect, _) = ui.allocate_exact_size(vec2(240.0, 14.0), Sense::hover());
        let step = rect.width() / COLOR_BAR_STEPS as f32;
        for i in 0..COLOR_BAR_STEPS {
            let x = rect.left() + i as f32 * step;
            let slice = egui::Rect::from_min_size(egui::pos2(x, rect.top()), vec2(step + 0.5, rect.height()));
            ui.painter()
                .rect_filled(slice, 0.0, viridis(i as f32 / (COLOR_BAR_STEPS - 1) as f32));
        }
        ui.label(format_value(Some(scale.max)));
    });
}
