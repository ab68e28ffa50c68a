use std::collections::BTreeMap;

use super::classify::is_country_code;
use super::error::InvalidMetricError;
use super::model::{Dataset, Field, MAP_FIELDS, Record};

// ---------------------------------------------------------------------------
// LatestSnapshot – most recent row per country
// ---------------------------------------------------------------------------

/// The most recently dated record of every country, ordered by `iso_code`.
/// Computed from the whole dataset, independent of any selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestSnapshot {
    rows: Vec<Record>,
}

impl LatestSnapshot {
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, iso_code: &str) -> Option<&Record> {
        self.rows
            .binary_search_by(|r| r.iso_code.as_str().cmp(iso_code))
            .ok()
            .map(|i| &self.rows[i])
    }
}

/// Stable-sort the country rows by date and keep the last one per code.
/// Rows sharing an entity's latest date resolve to the one appearing last in
/// the source.
pub fn latest(dataset: &Dataset) -> LatestSnapshot {
    let mut rows: Vec<&Record> = dataset
        .records()
        .iter()
        .filter(|r| is_country_code(&r.iso_code))
        .collect();
    rows.sort_by_key(|r| r.date);

    let mut by_code: BTreeMap<&str, &Record> = BTreeMap::new();
    for r in rows {
        by_code.insert(r.iso_code.as_str(), r);
    }

    log::debug!("latest snapshot covers {} countries", by_code.len());
    LatestSnapshot {
        rows: by_code.into_values().cloned().collect(),
    }
}

// ---------------------------------------------------------------------------
// MapLayer – one metric of the snapshot, ready for colouring
// ---------------------------------------------------------------------------

/// One map region.
#[derive(Debug, Clone, PartialEq)]
pub struct MapCell {
    pub iso_code: String,
    pub location: String,
    pub value: Option<f64>,
}

/// A metric projected onto the snapshot, with the value range for a
/// continuous colour scale.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayer {
    pub metric: Field,
    pub title: String,
    pub cells: Vec<MapCell>,
    /// `(min, max)` over the recorded values; `None` when nothing is recorded.
    pub range: Option<(f64, f64)>,
}

/// Project `metric` out of the snapshot. Only [`MAP_FIELDS`] are accepted.
pub fn map_layer(snapshot: &LatestSnapshot, metric: &str) -> Result<MapLayer, InvalidMetricError> {
    let metric = Field::parse_among(metric, &MAP_FIELDS)?;

    let cells: Vec<MapCell> = snapshot
        .rows()
        .iter()
        .map(|r| MapCell {
            iso_code: r.iso_code.clone(),
            location: r.location.clone(),
            value: r.value(metric),
        })
        .collect();

    let range = cells
        .iter()
        .filter_map(|c| c.value)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        });

    Ok(MapLayer {
        metric,
        title: format!("{} by Country", metric.label()),
        cells,
        range,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn row(code: &str, location: &str, day: u32, cases: Option<f64>) -> Record {
        Record {
            iso_code: code.to_string(),
            location: location.to_string(),
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            total_cases: cases,
            total_deaths: None,
            new_cases: None,
            new_deaths: None,
            people_fully_vaccinated_per_hundred: None,
        }
    }

    #[test]
    fn keeps_the_latest_row_of_each_country() {
        let ds = Dataset::new(
            vec![
                row("KEN", "Kenya", 2, Some(150.0)),
                row("UGA", "Uganda", 1, Some(50.0)),
                row("KEN", "Kenya", 1, Some(100.0)),
                row("OWID_WRL", "World", 9, Some(1e6)),
            ],
            0,
        );
        let snap = latest(&ds);

        assert_eq!(snap.len(), 2);
        assert_eq!(snap.get("KEN").unwrap().total_cases, Some(150.0));
        assert_eq!(snap.get("UGA").unwrap().total_cases, Some(50.0));
        assert!(snap.get("OWID_WRL").is_none());
    }

    #[test]
    fn equal_dates_resolve_to_the_last_source_row() {
        let ds = Dataset::new(
            vec![
                row("KEN", "Kenya", 3, Some(1.0)),
                row("KEN", "Kenya", 3, Some(2.0)),
                row("KEN", "Kenya", 1, Some(0.0)),
            ],
            0,
        );
        assert_eq!(latest(&ds).get("KEN").unwrap().total_cases, Some(2.0));
    }

    #[test]
    fn map_layer_range_skips_missing_values() {
        let ds = Dataset::new(
            vec![
                row("KEN", "Kenya", 1, Some(150.0)),
                row("UGA", "Uganda", 1, None),
                row("TZA", "Tanzania", 1, Some(20.0)),
            ],
            0,
        );
        let layer = map_layer(&latest(&ds), "total_cases").unwrap();

        assert_eq!(layer.title, "Total Cases by Country");
        assert_eq!(layer.cells.len(), 3);
        assert_eq!(layer.range, Some((20.0, 150.0)));
    }

    #[test]
    fn map_layer_rejects_series_only_metrics() {
        let err = map_layer(&LatestSnapshot::default(), "new_cases").unwrap_err();
        assert_eq!(err.requested(), "new_cases");
    }
}
