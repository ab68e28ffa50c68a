use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use data_tracker::data::{Field, FilteredView};

const ROW_HEIGHT: f32 = 18.0;

/// Format an observation: integers without decimals, missing as empty.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
        Some(v) => format!("{v:.2}"),
        None => String::new(),
    }
}

/// The filtered rows, one line per record.
pub fn filtered_table(ui: &mut Ui, view: &FilteredView) {
    ui.strong(format!("Filtered data ({} rows)", view.len()));
    if view.is_empty() {
        ui.label("No rows match the selected countries and dates.");
        return;
    }

    let rows = view.rows();
    ui.push_id("filtered_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(300.0)
            .columns(Column::auto().at_least(60.0), 3 + Field::ALL.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for title in ["iso_code", "location", "date"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
                for field in Field::ALL {
                    header.col(|ui| {
                        ui.strong(field.column());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let r = &rows[row.index()];
                    row.col(|ui| {
                        ui.label(&r.iso_code);
                    });
                    row.col(|ui| {
                        ui.label(&r.location);
                    });
                    row.col(|ui| {
                        ui.label(r.date.to_string());
                    });
                    for field in Field::ALL {
                        row.col(|ui| {
                            ui.label(format_value(r.value(field)));
                        });
                    }
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_format_compactly() {
        assert_eq!(format_value(Some(150.0)), "150");
        assert_eq!(format_value(Some(12.345)), "12.35");
        assert_eq!(format_value(None), "");
    }
}
