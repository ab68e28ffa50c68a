use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use data_tracker::data::{ChartPanel, SeriesPoint};

use crate::color::EntityColors;

// ---------------------------------------------------------------------------
// Time-series chart
// ---------------------------------------------------------------------------

/// Render one chart with a line per entity. Missing values break the line
/// instead of dropping to zero.
pub fn time_series_chart(ui: &mut Ui, panel: &ChartPanel, colors: &EntityColors) {
    ui.strong(panel.title);

    Plot::new(panel.metric.column())
        .height(280.0)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label(panel.y_label)
        .x_axis_formatter(|mark, _range| format_day(mark.value))
        .label_formatter(|name, value| {
            let day = format_day(value.x);
            if name.is_empty() {
                day
            } else {
                format!("{name}\n{day}: {:.0}", value.y)
            }
        })
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (entity, points) in &panel.series {
                let color = colors.color_for(entity);
                for segment in segments(points) {
                    let points: PlotPoints = segment.into_iter().collect();
                    plot_ui.line(Line::new(points).name(entity).color(color).width(1.5));
                }
            }
        });
}

/// Split a series into runs of consecutive recorded values, as `[x, y]`
/// pairs with `x` the day number.
fn segments(points: &[SeriesPoint]) -> Vec<Vec<[f64; 2]>> {
    let mut out: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut current = Vec::new();
    for p in points {
        match p.value {
            Some(v) => current.push([day_number(p.date), v]),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_day(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.to_string())
        .unwrap_or_default()
}
