#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the retrofit map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types so the API contract can evolve independently.

use retrofit_map_analytics_models::HeadlineStats;
use retrofit_map_building_models::RetrofitPriority;
use retrofit_map_spatial::BoundingBox;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body returned with 4xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable description.
    pub error: String,
}

impl ApiError {
    /// Wraps a message for a 4xx response body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Query parameters shared by the buildings and insights endpoints.
///
/// Everything arrives as text, the way a filter form submits it. Empty
/// values count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingQueryParams {
    /// `all`, `retrofit-candidates` or `custom-filter`. Defaults to
    /// `custom-filter` when any criteria are given, `all` otherwise.
    pub view: Option<String>,
    /// Tier name, e.g. `Critical`.
    pub priority: Option<String>,
    /// Exact property type.
    pub property_type: Option<String>,
    /// Inclusive minimum energy score (default 0).
    pub energy_min: Option<String>,
    /// Inclusive maximum energy score (default 100).
    pub energy_max: Option<String>,
}

impl BuildingQueryParams {
    /// Whether any filter criterion is present and non-empty.
    #[must_use]
    pub fn has_criteria(&self) -> bool {
        [
            &self.priority,
            &self.property_type,
            &self.energy_min,
            &self.energy_max,
        ]
        .iter()
        .any(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Where the served dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiDatasetOrigin {
    /// Loaded from the configured source.
    Fetched,
    /// Generated after the configured source failed.
    Synthetic,
}

/// `GET /api/dataset` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDataset {
    /// Whether the records are real or generated.
    pub origin: ApiDatasetOrigin,
    /// Source identifier (URL or path) for fetched data.
    pub source: Option<String>,
    /// Why fetching failed, for synthetic data.
    pub fallback_reason: Option<String>,
    /// Total records.
    pub record_count: usize,
    /// Records with finite coordinates.
    pub placeable_count: usize,
    /// Padded bounds of all placeable records.
    pub bounds: Option<BoundingBox>,
    /// Page-level stat widgets.
    pub headline: HeadlineStats,
}

/// One tier in the `GET /api/priorities` legend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPriority {
    /// Tier name.
    pub name: String,
    /// Four-letter abbreviation.
    pub short_label: String,
    /// Hex color.
    pub color: String,
    /// Whether the tier counts as a retrofit candidate.
    pub retrofit_candidate: bool,
}

impl From<RetrofitPriority> for ApiPriority {
    fn from(priority: RetrofitPriority) -> Self {
        Self {
            name: priority.to_string(),
            short_label: priority.short_label().to_string(),
            color: priority.color().to_string(),
            retrofit_candidate: priority.is_retrofit_candidate(),
        }
    }
}
