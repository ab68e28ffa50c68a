/// Data layer: core types, loading, and the views derived for the dashboard.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset
///   └──────────┘
///        │
///        ├──────────────────────────┐
///        ▼                          ▼
///   ┌──────────┐              ┌──────────┐
///   │ classify │ EntitySet    │ snapshot │ latest row per country → MapLayer
///   └──────────┘              └──────────┘
///        │ selection + interval
///        ▼
///   ┌──────────┐   ┌──────────┐
///   │  filter  │ → │  series  │  one line per entity
///   └──────────┘   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view   │  advisory state, or table + charts
///   └──────────┘
/// ```

pub mod classify;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod series;
pub mod snapshot;
pub mod view;

pub use classify::{EntitySet, classify, is_country_code};
pub use error::{InvalidMetricError, LoadError};
pub use filter::{FilteredView, filter, selection_bounds};
pub use loader::load_file;
pub use model::{DateInterval, Dataset, Field, MAP_FIELDS, Record, SERIES_FIELDS};
pub use series::{SeriesPoint, SeriesSet, series};
pub use snapshot::{LatestSnapshot, MapCell, MapLayer, latest, map_layer};
pub use view::{ADVISORY_MESSAGE, Charts, ChartPanel, DashboardView, prepare};
