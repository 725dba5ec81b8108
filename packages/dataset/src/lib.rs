#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Building dataset loading.
//!
//! The dataset is fetched once at startup from a [`RecordSource`] and held
//! immutably for the rest of the session. Loading never fails: any fetch
//! error, malformed body, or timeout is logged and replaced by a synthetic
//! sample (see [`sample`]), so the map always has something to show.

pub mod sample;
pub mod sources;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use retrofit_map_building_models::BuildingRecord;
use retrofit_map_config::DatasetConfig;

/// Errors that can occur while fetching the dataset.
///
/// None of these escape [`load`]; they only decide why the synthetic
/// fallback was used.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Request to {url} returned status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The body was not a JSON array of records.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading a local file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The fetch did not finish in time.
    #[error("Fetch from {source_id} timed out after {timeout:?}")]
    Timeout {
        /// Source that timed out.
        source_id: String,
        /// Configured timeout.
        timeout: Duration,
    },
}

/// A place building records can be fetched from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns a short identifier for logs (a URL or a path).
    fn id(&self) -> &str;

    /// Fetches and decodes the full record collection.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the fetch or decode fails.
    async fn fetch(&self) -> Result<Vec<BuildingRecord>, DatasetError>;
}

/// Where the loaded records came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetOrigin {
    /// Records were fetched from the configured source.
    Fetched {
        /// Source identifier.
        source: String,
    },
    /// Records were generated because fetching failed.
    Synthetic {
        /// Why the fetch failed.
        reason: String,
    },
}

/// The immutable base record collection for a session.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[BuildingRecord]>,
    origin: DatasetOrigin,
}

impl Dataset {
    /// Wraps an already-loaded record collection.
    #[must_use]
    pub fn new(records: Vec<BuildingRecord>, origin: DatasetOrigin) -> Self {
        Self {
            records: records.into(),
            origin,
        }
    }

    /// All records, in dataset order.
    #[must_use]
    pub fn records(&self) -> &[BuildingRecord] {
        &self.records
    }

    /// A cheap shared handle to the records.
    #[must_use]
    pub fn shared(&self) -> Arc<[BuildingRecord]> {
        Arc::clone(&self.records)
    }

    /// Where the records came from.
    #[must_use]
    pub const fn origin(&self) -> &DatasetOrigin {
        &self.origin
    }

    /// Whether the records are synthetic.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self.origin, DatasetOrigin::Synthetic { .. })
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decodes a JSON array of building records.
///
/// # Errors
///
/// Returns [`DatasetError::Json`] if the text is not a JSON array of
/// objects.
pub fn parse_records(text: &str) -> Result<Vec<BuildingRecord>, DatasetError> {
    Ok(serde_json::from_str(text)?)
}

/// Loads the dataset described by `config`, falling back to synthetic data
/// on any failure.
pub async fn load(config: &DatasetConfig) -> Dataset {
    let source = sources::source_for(&config.location);
    load_from(source.as_ref(), config).await
}

/// Loads the dataset from an explicit source, falling back to synthetic
/// data on any failure.
pub async fn load_from(source: &dyn RecordSource, config: &DatasetConfig) -> Dataset {
    let timeout = config.fetch_timeout();
    log::info!("Loading building data from {}...", source.id());

    let result = match tokio::time::timeout(timeout, source.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(DatasetError::Timeout {
            source_id: source.id().to_string(),
            timeout,
        }),
    };

    match result {
        Ok(records) => {
            if records.is_empty() {
                log::warn!("{} returned an empty dataset", source.id());
            }
            log::info!("Loaded {} buildings from {}", records.len(), source.id());
            Dataset::new(
                records,
                DatasetOrigin::Fetched {
                    source: source.id().to_string(),
                },
            )
        }
        Err(e) => {
            log::warn!("Failed to load building data ({e}), using sample data");
            let seed = config.sample.seed.unwrap_or_else(sample::clock_seed);
            let records = sample::generate(&config.sample, seed);
            log::info!("Generated {} sample buildings (seed {seed})", records.len());
            Dataset::new(
                records,
                DatasetOrigin::Synthetic {
                    reason: e.to_string(),
                },
            )
        }
    }
}
