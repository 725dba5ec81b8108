#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Runtime configuration for the retrofit map.
//!
//! Every section has defaults matching the behavior of the public map page,
//! so an empty (or absent) TOML file yields a working configuration. A user
//! file only needs the keys it wants to change:
//!
//! ```toml
//! [dataset.location]
//! type = "url"
//! url = "https://example.org/buildings.json"
//!
//! [overlay]
//! insights_dismiss_secs = 30
//! ```
//!
//! The server section honours the `BIND_ADDR` and `PORT` environment
//! variables on top of whatever the file says.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has the wrong shape.
    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("Invalid config value: {message}")]
    Invalid {
        /// Description of the offending value.
        message: String,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where building records come from.
    pub dataset: DatasetConfig,
    /// Map bounds fitting and clustering.
    pub map: MapConfig,
    /// Insights overlay behavior.
    pub overlay: OverlayConfig,
    /// Embedded dashboard behavior.
    pub dashboard: DashboardConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

impl AppConfig {
    /// Loads configuration from `path`, or defaults when `path` is `None`,
    /// then applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid TOML,
    /// or contains out-of-range values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        config.server.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML for
    /// this schema.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Checks values that parse fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sample = &self.dataset.sample;
        if sample.property_types.is_empty() {
            return Err(invalid("dataset.sample.property_types must not be empty"));
        }
        if !(sample.jitter_degrees.is_finite() && sample.jitter_degrees >= 0.0) {
            return Err(invalid("dataset.sample.jitter_degrees must be a finite, non-negative number"));
        }
        if self.dataset.fetch_timeout_secs == 0 {
            return Err(invalid("dataset.fetch_timeout_secs must be greater than zero"));
        }
        if self.overlay.insights_dismiss_secs == 0 {
            return Err(invalid("overlay.insights_dismiss_secs must be greater than zero"));
        }
        if self.dashboard.load_timeout_secs == 0 {
            return Err(invalid("dashboard.load_timeout_secs must be greater than zero"));
        }
        if self.map.cluster_max_zoom > MAX_ZOOM || self.map.initial_fit.max_zoom > MAX_ZOOM {
            return Err(invalid(&format!("map zoom levels must be at most {MAX_ZOOM}")));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid {
        message: message.to_string(),
    }
}

/// Highest zoom level the map tiles support.
pub const MAX_ZOOM: u8 = 22;

/// Where to fetch the dataset from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatasetLocation {
    /// A JSON array served over HTTP(S).
    Url {
        /// Full URL of the JSON resource.
        url: String,
    },
    /// A JSON array on the local filesystem.
    File {
        /// Path to the JSON file.
        path: PathBuf,
    },
}

impl Default for DatasetLocation {
    fn default() -> Self {
        Self::File {
            path: PathBuf::from("assets/data/buildings.json"),
        }
    }
}

/// Dataset loading settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Where to load records from.
    pub location: DatasetLocation,
    /// Give up on the fetch after this many seconds and use sample data.
    pub fetch_timeout_secs: u64,
    /// Synthetic fallback dataset settings.
    pub sample: SampleConfig,
}

impl DatasetConfig {
    /// Fetch timeout as a [`Duration`].
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            location: DatasetLocation::default(),
            fetch_timeout_secs: 10,
            sample: SampleConfig::default(),
        }
    }
}

/// Shape of the synthetic dataset used when loading fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Number of records to generate.
    pub size: usize,
    /// PRNG seed. A clock-derived seed is used when unset.
    pub seed: Option<u64>,
    /// Latitude the points are scattered around.
    pub center_latitude: f64,
    /// Longitude the points are scattered around.
    pub center_longitude: f64,
    /// Full width of the scatter window on each axis, in degrees.
    pub jitter_degrees: f64,
    /// Property types to draw from.
    pub property_types: Vec<String>,
    /// Earliest construction year.
    pub first_year_built: i32,
    /// Number of distinct construction years after `first_year_built`.
    pub year_built_span: u32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            size: 300,
            seed: None,
            center_latitude: 41.8781,
            center_longitude: -87.6298,
            jitter_degrees: 0.4,
            property_types: ["Office", "Residential", "School", "Hospital", "Retail"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            first_year_built: 1950,
            year_built_span: 70,
        }
    }
}

/// Camera fit parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Screen padding around the fitted box, in pixels.
    pub padding_px: u32,
    /// Never zoom in past this level when fitting.
    pub max_zoom: u8,
}

/// Map presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Cluster radius in pixels.
    pub cluster_radius: u32,
    /// Zoom level past which points are no longer clustered.
    pub cluster_max_zoom: u8,
    /// Fit used once at load time for the full dataset.
    pub initial_fit: FitConfig,
    /// Fit used by the "fit to data" control.
    pub view_fit: FitConfig,
    /// Estimated building popup width, for anchor selection.
    pub popup_width_px: f64,
    /// Estimated building popup height, for anchor selection.
    pub popup_height_px: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            cluster_radius: 50,
            cluster_max_zoom: 14,
            initial_fit: FitConfig {
                padding_px: 20,
                max_zoom: 16,
            },
            view_fit: FitConfig {
                padding_px: 50,
                max_zoom: 15,
            },
            popup_width_px: 300.0,
            popup_height_px: 400.0,
        }
    }
}

/// Insights overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Seconds before an open overlay closes itself.
    pub insights_dismiss_secs: u64,
    /// Minimum gap kept between a dragged overlay and the map edge.
    pub drag_padding_px: f64,
    /// How many property types the overlay lists.
    pub top_property_types: usize,
}

impl OverlayConfig {
    /// Auto-dismiss delay as a [`Duration`].
    #[must_use]
    pub const fn insights_dismiss(&self) -> Duration {
        Duration::from_secs(self.insights_dismiss_secs)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            insights_dismiss_secs: 15,
            drag_padding_px: 10.0,
            top_property_types: 3,
        }
    }
}

/// Embedded dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Seconds to wait for the embed before showing the fallback panel.
    pub load_timeout_secs: u64,
}

impl DashboardConfig {
    /// Load timeout as a [`Duration`].
    #[must_use]
    pub const fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            load_timeout_secs: 10,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory of frontend files served at `/`.
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Overrides the bind address and port from `BIND_ADDR` / `PORT`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(bind_addr) = std::env::var("BIND_ADDR") {
            self.bind_addr = bind_addr;
        }
        if let Ok(port) = std::env::var("PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(e) => log::warn!("Ignoring invalid PORT '{port}': {e}"),
            }
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: PathBuf::from("app/dist"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.dataset.sample.size, 300);
        assert_eq!(config.overlay.insights_dismiss(), Duration::from_secs(15));
        assert_eq!(config.dashboard.load_timeout(), Duration::from_secs(10));
        assert_eq!(config.map.cluster_radius, 50);
        assert_eq!(config.map.cluster_max_zoom, 14);
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let config = AppConfig::from_toml(
            r#"
            [dataset.location]
            type = "url"
            url = "https://example.org/buildings.json"

            [dataset.sample]
            size = 25
            seed = 42

            [overlay]
            insights_dismiss_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(
            config.dataset.location,
            DatasetLocation::Url {
                url: "https://example.org/buildings.json".to_string()
            }
        );
        assert_eq!(config.dataset.sample.size, 25);
        assert_eq!(config.dataset.sample.seed, Some(42));
        assert_eq!(config.dataset.sample.property_types.len(), 5);
        assert_eq!(config.overlay.insights_dismiss_secs, 30);
        assert_eq!(config.overlay.top_property_types, 3);
    }

    #[test]
    fn rejects_unknown_location_type() {
        let result = AppConfig::from_toml(
            r#"
            [dataset.location]
            type = "ftp"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn validate_rejects_zero_timeouts() {
        let mut config = AppConfig::default();
        config.overlay.insights_dismiss_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_property_types() {
        let mut config = AppConfig::default();
        config.dataset.sample.property_types.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let result = AppConfig::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
