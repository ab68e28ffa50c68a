use eframe::egui;

use data_tracker::config::DashboardConfig;
use data_tracker::data::{DashboardView, Dataset};

use crate::state::AppState;
use crate::ui::{map, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataTrackerApp {
    pub state: AppState,
}

impl DataTrackerApp {
    pub fn new(config: &DashboardConfig, dataset: Dataset) -> Self {
        let mut state = AppState::new(config.map_metric);
        state.set_dataset(dataset, &config.dataset_path);
        Self { state }
    }
}

impl eframe::App for DataTrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table, charts, map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("COVID-19 Data Analysis");
                    ui.separator();

                    match &self.state.view {
                        DashboardView::Advisory(message) => {
                            ui.colored_label(egui::Color32::from_rgb(0xd9, 0x8c, 0x00), *message);
                        }
                        DashboardView::Ready(charts) => {
                            table::filtered_table(ui, &charts.table);
                            for panel in &charts.panels {
                                ui.add_space(12.0);
                                plot::time_series_chart(ui, panel, &self.state.entity_colors);
                            }
                            ui.add_space(12.0);
                            map::choropleth(ui, self.state.map.as_ref());
                        }
                    }
                });
        });
    }
}
