use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::error::InvalidMetricError;
use super::filter::FilteredView;
use super::model::{Field, SERIES_FIELDS};

/// One plotted point. A missing value is kept so the line can break there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Entity name → its points in ascending date order.
pub type SeriesSet = BTreeMap<String, Vec<SeriesPoint>>;

/// Split `view` into one time series per entity for `metric`.
///
/// `metric` must name one of [`SERIES_FIELDS`].
pub fn series(view: &FilteredView, metric: &str) -> Result<SeriesSet, InvalidMetricError> {
    let field = Field::parse_among(metric, &SERIES_FIELDS)?;
    Ok(series_for(view, field))
}

pub(crate) fn series_for(view: &FilteredView, field: Field) -> SeriesSet {
    let mut out = SeriesSet::new();
    for r in view.rows() {
        out.entry(r.location.clone()).or_default().push(SeriesPoint {
            date: r.date,
            value: r.value(field),
        });
    }
    // Stable: equal dates keep their row order.
    for points in out.values_mut() {
        points.sort_by_key(|p| p.date);
    }
    out
}
