//! Data preparation for the COVID-19 dashboard: loading the table, picking
//! the selectable countries, filtering by selection and date range, and
//! deriving the per-country series and latest-value map.

pub mod config;
pub mod data;
