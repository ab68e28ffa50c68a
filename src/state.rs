use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use data_tracker::data::{
    ADVISORY_MESSAGE, DashboardView, Dataset, DateInterval, EntitySet, Field, LatestSnapshot,
    MapLayer, classify, latest, load_file, map_layer, prepare, selection_bounds,
};

use crate::color::EntityColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// File the dataset came from.
    pub source_path: Option<PathBuf>,

    /// Selectable countries.
    pub entities: EntitySet,

    /// Latest row per country, computed once per dataset.
    pub snapshot: LatestSnapshot,

    /// Countries picked by the user.
    pub selected: BTreeSet<String>,

    /// Dates available to the current selection.
    pub bounds: Option<DateInterval>,

    /// Chosen date interval, always inside `bounds`.
    pub interval: Option<DateInterval>,

    /// Metric shown on the map.
    pub map_metric: Field,

    /// Table and charts for the current selection (cached).
    pub view: DashboardView,

    /// Map for the current metric (cached).
    pub map: Option<MapLayer>,

    /// Line colour per country.
    pub entity_colors: EntityColors,

    /// Text typed into the country search box.
    pub entity_search: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(map_metric: Field) -> Self {
        Self {
            dataset: None,
            source_path: None,
            entities: EntitySet::default(),
            snapshot: LatestSnapshot::default(),
            selected: BTreeSet::new(),
            bounds: None,
            interval: None,
            map_metric,
            view: DashboardView::Advisory(ADVISORY_MESSAGE),
            map: None,
            entity_colors: EntityColors::default(),
            entity_search: String::new(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset the selection.
    pub fn set_dataset(&mut self, dataset: Dataset, path: &Path) {
        self.entities = classify(&dataset);
        self.snapshot = latest(&dataset);
        self.entity_colors = EntityColors::new(self.entities.iter());
        self.selected.clear();
        self.interval = None;

        self.dataset = Some(dataset);
        self.source_path = Some(path.to_path_buf());
        self.status_message = None;

        self.rebuild_map();
        self.recompute();
    }

    /// Load `path`, reporting failures in the status bar.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                self.set_dataset(dataset, path);
                log::info!(
                    "Loaded {} records, {} countries",
                    self.dataset.as_ref().map_or(0, Dataset::len),
                    self.entities.len()
                );
            }
            Err(e) => {
                let e = anyhow::Error::new(e).context(format!("loading {}", path.display()));
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute bounds, interval and views after a selection change.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };

        self.bounds = selection_bounds(ds.records(), &self.selected);
        self.interval = match (self.interval, self.bounds) {
            (Some(current), Some(bounds)) => Some(current.clamp_to(&bounds)),
            (None, bounds) => bounds,
            (Some(_), None) => None,
        };

        self.view = match self.interval.or_else(|| ds.date_bounds()) {
            Some(interval) => prepare(ds, &self.selected, interval),
            None => DashboardView::Advisory(ADVISORY_MESSAGE),
        };
    }

    /// Rebuild the map layer from the current `map_metric`.
    pub fn rebuild_map(&mut self) {
        match map_layer(&self.snapshot, self.map_metric.column()) {
            Ok(layer) => self.map = Some(layer),
            Err(e) => {
                log::error!("{e}");
                self.status_message = Some(format!("Error: {e}"));
                self.map = None;
            }
        }
    }

    pub fn set_map_metric(&mut self, metric: Field) {
        if self.map_metric != metric {
            self.map_metric = metric;
            self.rebuild_map();
        }
    }

    /// Toggle a single country in the selection.
    pub fn toggle_entity(&mut self, name: &str) {
        if !self.selected.remove(name) {
            self.selected.insert(name.to_string());
        }
        self.recompute();
    }

    /// Deselect all countries.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.recompute();
    }

    /// Move the start of the interval; the end follows if it would fall before it.
    pub fn set_interval_start(&mut self, start: NaiveDate) {
        if let Some(current) = self.interval {
            let end = current.end().max(start);
            self.set_interval(DateInterval::new(start, end));
        }
    }

    /// Move the end of the interval; the start follows if it would fall after it.
    pub fn set_interval_end(&mut self, end: NaiveDate) {
        if let Some(current) = self.interval {
            let start = current.start().min(end);
            self.set_interval(DateInterval::new(start, end));
        }
    }

    fn set_interval(&mut self, interval: Option<DateInterval>) {
        if let (Some(interval), Some(bounds)) = (interval, self.bounds) {
            self.interval = Some(interval.clamp_to(&bounds));
            self.recompute();
        }
    }
}

#[cfg(test)]
mod tests {
    use data_tracker::data::Record;

    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
    }

    fn row(code: &str, location: &str, day: u32) -> Record {
        Record {
            iso_code: code.to_string(),
            location: location.to_string(),
            date: d(day),
            total_cases: Some(day as f64),
            total_deaths: Some(0.0),
            new_cases: None,
            new_deaths: None,
            people_fully_vaccinated_per_hundred: None,
        }
    }

    fn loaded() -> AppState {
        let mut state = AppState::new(Field::TotalCases);
        let ds = Dataset::new(
            vec![
                row("KEN", "Kenya", 1),
                row("KEN", "Kenya", 10),
                row("UGA", "Uganda", 5),
                row("OWID_WRL", "World", 20),
            ],
            0,
        );
        state.set_dataset(ds, Path::new("memory.csv"));
        state
    }

    #[test]
    fn starts_in_advisory_state_with_full_map() {
        let state = loaded();
        assert_eq!(state.view, DashboardView::Advisory(ADVISORY_MESSAGE));
        assert_eq!(state.map.as_ref().unwrap().cells.len(), 2);
        assert_eq!(state.entities.len(), 2);
    }

    #[test]
    fn selecting_sets_interval_to_selection_bounds() {
        let mut state = loaded();
        state.toggle_entity("Kenya");
        assert_eq!(state.interval, DateInterval::new(d(1), d(10)));
        assert_eq!(state.view.charts().unwrap().table.len(), 2);

        state.set_interval_start(d(4));
        assert_eq!(state.interval, DateInterval::new(d(4), d(10)));
        assert_eq!(state.view.charts().unwrap().table.len(), 1);

        state.set_interval_end(d(2));
        assert_eq!(state.interval, Some(DateInterval::day(d(2))));
        assert!(state.view.charts().unwrap().table.is_empty());

        state.toggle_entity("Kenya");
        assert!(state.view.charts().is_none());
    }

    #[test]
    fn opening_a_file_replaces_the_dataset() {
        let mut state = loaded();
        state.toggle_entity("Kenya");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(
            &path,
            "iso_code,location,date,total_cases,total_deaths,new_cases,new_deaths,people_fully_vaccinated_per_hundred\n\
             RWA,Rwanda,2021-02-01,10,1,,,\n\
             TZA,Tanzania,2021-02-01,20,2,,,\n\
             OWID_AFR,Africa,2021-02-01,30,3,,,\n",
        )
        .unwrap();

        state.open(&path);
        assert_eq!(state.entities.iter().collect::<Vec<_>>(), ["Rwanda", "Tanzania"]);
        assert_eq!(state.dataset.as_ref().unwrap().len(), 3);
        assert!(state.selected.is_empty());
        assert!(state.status_message.is_none());

        state.open(&dir.path().join("missing.csv"));
        assert!(state.status_message.as_deref().unwrap().starts_with("Error: loading"));
        assert_eq!(state.entities.len(), 2);
    }

    #[test]
    fn changing_map_metric_rebuilds_layer() {
        let mut state = loaded();
        state.set_map_metric(Field::TotalDeaths);
        assert_eq!(state.map.as_ref().unwrap().metric, Field::TotalDeaths);
    }
}
