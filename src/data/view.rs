use std::collections::BTreeSet;

use super::filter::{FilteredView, filter};
use super::model::{Dataset, DateInterval, Field, SERIES_FIELDS};
use super::series::{SeriesSet, series_for};

/// Shown instead of any table or chart while no country is selected.
pub const ADVISORY_MESSAGE: &str = "Please select at least one country.";

// ---------------------------------------------------------------------------
// Chart panels
// ---------------------------------------------------------------------------

/// One line chart: a metric, its captions, and one series per entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub metric: Field,
    pub title: &'static str,
    pub y_label: &'static str,
    pub series: SeriesSet,
}

fn captions(metric: Field) -> (&'static str, &'static str) {
    match metric {
        Field::TotalCases => ("Total COVID-19 Cases Over Time", "Total Cases"),
        Field::TotalDeaths => ("Total COVID-19 Deaths Over Time", "Total Deaths"),
        Field::NewCases => ("Daily New COVID-19 Cases", "New Cases"),
        Field::NewDeaths => ("Daily New COVID-19 Deaths", "New Deaths"),
        Field::PeopleFullyVaccinatedPerHundred => (
            "People Fully Vaccinated per Hundred",
            "Fully Vaccinated per Hundred",
        ),
    }
}

/// Everything drawn for a non-empty selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Charts {
    pub table: FilteredView,
    pub panels: Vec<ChartPanel>,
}

// ---------------------------------------------------------------------------
// DashboardView
// ---------------------------------------------------------------------------

/// What the dashboard shows for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// Nothing selected: show the message, compute nothing.
    Advisory(&'static str),
    Ready(Charts),
}

impl DashboardView {
    pub fn charts(&self) -> Option<&Charts> {
        match self {
            DashboardView::Ready(charts) => Some(charts),
            DashboardView::Advisory(_) => None,
        }
    }
}

/// Build the table and the four time-series charts for a selection.
pub fn prepare(
    dataset: &Dataset,
    entities: &BTreeSet<String>,
    interval: DateInterval,
) -> DashboardView {
    if entities.is_empty() {
        return DashboardView::Advisory(ADVISORY_MESSAGE);
    }

    let table = filter(dataset.records(), entities, interval);
    let panels = SERIES_FIELDS
        .into_iter()
        .map(|metric| {
            let (title, y_label) = captions(metric);
            ChartPanel {
                metric,
                title,
                y_label,
                series: series_for(&table, metric),
            }
        })
        .collect();

    log::debug!(
        "prepared {} rows for {} entities over {interval}",
        table.len(),
        entities.len()
    );
    DashboardView::Ready(Charts { table, panels })
}
