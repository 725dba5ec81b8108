#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Building record and retrofit priority tier types.
//!
//! This crate defines the shape of one row of the building dataset and the
//! closed five-tier retrofit priority classification used across the whole
//! retrofit-map system. Records are decoded leniently: a malformed field
//! becomes `None` instead of rejecting the whole dataset.

pub mod de;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Bucket label used for records without a property type.
pub const UNKNOWN_PROPERTY_TYPE: &str = "Unknown";

/// Color used for records whose tier is missing or unrecognized.
pub const DEFAULT_PRIORITY_COLOR: &str = "#9ca3af";

/// Retrofit priority tier, from most urgent (`Critical`) to least
/// (`Minimal`).
///
/// `Unknown` stands in for any tier text the dataset carries that is not one
/// of the five recognized values. It is colored with the default grey and
/// never counted in a tier bucket.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RetrofitPriority {
    /// Immediate action (retrofit score 80-100)
    Critical,
    /// High priority (60-79)
    High,
    /// Moderate priority (40-59)
    Medium,
    /// Low priority (20-39)
    Low,
    /// No immediate need (0-19)
    Minimal,
    /// Unrecognized tier text
    Unknown,
}

impl RetrofitPriority {
    /// Returns the five recognized tiers in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Critical,
            Self::High,
            Self::Medium,
            Self::Low,
            Self::Minimal,
        ]
    }

    /// Parses tier text, mapping anything unrecognized to [`Self::Unknown`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.trim().parse().unwrap_or(Self::Unknown)
    }

    /// Whether this is one of the five recognized tiers.
    #[must_use]
    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Whether buildings in this tier are retrofit candidates.
    #[must_use]
    pub const fn is_retrofit_candidate(self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }

    /// Hex color used for map points and distribution cells.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Critical => "#dc2626",
            Self::High => "#ea580c",
            Self::Medium => "#d97706",
            Self::Low => "#65a30d",
            Self::Minimal => "#059669",
            Self::Unknown => DEFAULT_PRIORITY_COLOR,
        }
    }

    /// Four-letter abbreviation shown under distribution counts.
    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::Critical => "Crit",
            Self::High => "High",
            Self::Medium => "Medi",
            Self::Low => "Low",
            Self::Minimal => "Mini",
            Self::Unknown => "Unkn",
        }
    }
}

/// One building entry in the dataset.
///
/// Field names match the static dataset exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    /// Dataset identifier.
    #[serde(default, deserialize_with = "de::lenient_id")]
    pub id: i64,
    /// Building name.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub property_name: Option<String>,
    /// Street address.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub address: Option<String>,
    /// Primary property type (e.g. "Office", "K-12 School").
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub primary_property_type: Option<String>,
    /// Retrofit priority tier.
    #[serde(default, deserialize_with = "de::lenient_priority")]
    pub retrofit_priority: Option<RetrofitPriority>,
    /// ENERGY STAR score (0-100).
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub energy_star_score: Option<i64>,
    /// Computed retrofit score.
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub retrofit_score: Option<f64>,
    /// Year of construction.
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub year_built: Option<i32>,
    /// Latitude (WGS84).
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub longitude: Option<f64>,
    /// Site energy-use intensity in kBtu per square foot.
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub site_eui_kbtu_sq_ft: Option<f64>,
    /// Greenhouse-gas intensity in kg CO2e per square foot.
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub ghg_intensity_kg_co2e_sq_ft: Option<f64>,
    /// Whether the building has been flagged for retrofit.
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub needs_retrofit: Option<bool>,
    /// City of Chicago energy rating.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub chicago_energy_rating: Option<String>,
}

impl BuildingRecord {
    /// Returns `(longitude, latitude)` if both are present and finite.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lng), Some(lat)) if lng.is_finite() && lat.is_finite() => Some((lng, lat)),
            _ => None,
        }
    }

    /// The recognized tier, or `None` when missing or unrecognized.
    #[must_use]
    pub fn tier(&self) -> Option<RetrofitPriority> {
        self.retrofit_priority.filter(|p| p.is_recognized())
    }

    /// Whether the record is in the `Critical` or `High` tier.
    #[must_use]
    pub fn is_retrofit_candidate(&self) -> bool {
        self.retrofit_priority
            .is_some_and(RetrofitPriority::is_retrofit_candidate)
    }

    /// Property type, or [`UNKNOWN_PROPERTY_TYPE`] when absent.
    #[must_use]
    pub fn property_type_or_unknown(&self) -> &str {
        self.primary_property_type
            .as_deref()
            .unwrap_or(UNKNOWN_PROPERTY_TYPE)
    }

    /// Energy score if it qualifies for averaging (present and > 0).
    #[must_use]
    pub fn qualifying_energy_score(&self) -> Option<i64> {
        self.energy_star_score.filter(|s| *s > 0)
    }

    /// Retrofit score if it qualifies for averaging (present and > 0).
    #[must_use]
    pub fn qualifying_retrofit_score(&self) -> Option<f64> {
        self.retrofit_score.filter(|s| *s > 0.0)
    }

    /// Building age as of `current_year`.
    #[must_use]
    pub fn age_in(&self, current_year: i32) -> Option<i32> {
        self.year_built.map(|built| current_year - built)
    }

    /// Whether the building is flagged as needing a retrofit.
    #[must_use]
    pub fn is_flagged_for_retrofit(&self) -> bool {
        self.needs_retrofit == Some(true)
    }
}
