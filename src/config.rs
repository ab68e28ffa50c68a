//! Startup configuration for the dashboard.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::{Field, MAP_FIELDS};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "DATA_TRACKER_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "data-tracker.json";

/// Dataset opened at startup when nothing else is configured.
pub const DEFAULT_DATASET: &str = "owid-covid-data.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset loaded at startup.
    pub dataset_path: PathBuf,
    /// Metric initially shown on the map; must be one of the map metrics.
    pub map_metric: Field,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            map_metric: MAP_FIELDS[0],
            window_size: [1280.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Read a config file. Unknown map metrics fall back to the default one.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;

        if !MAP_FIELDS.contains(&config.map_metric) {
            log::warn!(
                "{} cannot be shown on the map, using {}",
                config.map_metric,
                MAP_FIELDS[0]
            );
            config.map_metric = MAP_FIELDS[0];
        }
        Ok(config)
    }

    /// Resolve the config for this process: `$DATA_TRACKER_CONFIG`, then
    /// `data-tracker.json` in the working directory, then defaults. A dataset
    /// path given as the first command-line argument wins over all of them.
    pub fn resolve(env_path: Option<PathBuf>, dataset_arg: Option<PathBuf>) -> Result<Self> {
        let mut config = match env_path {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        if let Some(path) = dataset_arg {
            config.dataset_path = path;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "map_metric": "total_deaths" }}"#).unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.map_metric, Field::TotalDeaths);
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET));
    }

    #[test]
    fn series_only_metric_falls_back_to_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "map_metric": "new_cases" }}"#).unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.map_metric, Field::TotalCases);
    }

    #[test]
    fn command_line_dataset_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "dataset_path": "from-file.csv" }}"#).unwrap();

        let config = DashboardConfig::resolve(
            Some(file.path().to_path_buf()),
            Some(PathBuf::from("from-args.csv")),
        )
        .unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("from-args.csv"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(DashboardConfig::from_file(file.path()).is_err());
    }
}
