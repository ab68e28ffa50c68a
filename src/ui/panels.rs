use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use data_tracker::data::MAP_FIELDS;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel: countries, date range, map metric.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    country_picker(ui, state);
    ui.separator();
    date_range(ui, state);
    ui.separator();
    map_metric(ui, state);
}

fn country_picker(ui: &mut Ui, state: &mut AppState) {
    ui.strong(format!(
        "Select Countries  ({}/{})",
        state.selected.len(),
        state.entities.len()
    ));

    ui.horizontal(|ui: &mut Ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.entity_search)
                .hint_text("Search…")
                .desired_width(150.0),
        );
        if ui.small_button("Clear").clicked() {
            state.clear_selection();
        }
    });

    // Clone what we need so we can mutate state inside the loop.
    let needle = state.entity_search.to_lowercase();
    let names: Vec<String> = state
        .entities
        .iter()
        .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect();

    ScrollArea::vertical()
        .id_salt("country_list")
        .max_height(320.0)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for name in &names {
                let mut checked = state.selected.contains(name);
                let text = if checked {
                    RichText::new(name).color(state.entity_colors.color_for(name))
                } else {
                    RichText::new(name)
                };
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_entity(name);
                }
            }
        });
}

fn date_range(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Select Date Range");

    let (Some(interval), Some(bounds)) = (state.interval, state.bounds) else {
        ui.label("Select a country to choose dates.");
        return;
    };

    let mut start = interval.start();
    let mut end = interval.end();

    egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("From");
        if ui
            .add(DatePickerButton::new(&mut start).id_salt("start_date"))
            .changed()
        {
            state.set_interval_start(start);
        }
        ui.end_row();

        ui.label("To");
        if ui
            .add(DatePickerButton::new(&mut end).id_salt("end_date"))
            .changed()
        {
            state.set_interval_end(end);
        }
        ui.end_row();
    });

    ui.small(format!("Available: {bounds}"));
}

fn map_metric(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Select a metric to display on the map");
    let current = state.map_metric;
    egui::ComboBox::from_id_salt("map_metric")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for metric in MAP_FIELDS {
                if ui
                    .selectable_label(current == metric, metric.label())
                    .clicked()
                {
                    state.set_map_metric(metric);
                }
            }
        });
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
            let source = state
                .source_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let range = ds
                .date_bounds()
                .map(|b| b.to_string())
                .unwrap_or_default();
            ui.label(format!(
                "{source}: {} rows, {} countries, {range}",
                ds.len(),
                state.entities.len()
            ));
            if ds.skipped_rows() > 0 {
                ui.label(
                    RichText::new(format!("{} rows without a date skipped", ds.skipped_rows()))
                        .weak(),
                );
            }
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
        .set_title("Open COVID-19 dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
