#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter criteria and summary statistic types for building analytics.
//!
//! Defines the input of the filter engine ([`FilterCriteria`]) and the
//! derived, never-persisted outputs of the aggregator
//! ([`SummaryStatistics`], [`FilterInsights`], [`HeadlineStats`]).

use retrofit_map_building_models::RetrofitPriority;
use serde::{Deserialize, Serialize};

/// Lower bound of the full energy-score range.
pub const FULL_RANGE_MIN: i64 = 0;

/// Upper bound of the full energy-score range.
pub const FULL_RANGE_MAX: i64 = 100;

/// Number of property types listed in the insights panel.
pub const TOP_PROPERTY_TYPES: usize = 3;

/// Text shown in place of an unavailable average.
pub const UNAVAILABLE: &str = "N/A";

/// Independent, ANDed filter axes over building records.
///
/// The default value (no tier, no type, 0-100 range) matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Exact tier match.
    pub priority: Option<RetrofitPriority>,
    /// Exact property type match. Empty text counts as absent.
    pub property_type: Option<String>,
    /// Inclusive minimum energy score.
    pub energy_min: i64,
    /// Inclusive maximum energy score.
    pub energy_max: i64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            priority: None,
            property_type: None,
            energy_min: FULL_RANGE_MIN,
            energy_max: FULL_RANGE_MAX,
        }
    }
}

impl FilterCriteria {
    /// Restricts to one tier.
    #[must_use]
    pub const fn with_priority(mut self, priority: RetrofitPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts to one property type.
    #[must_use]
    pub fn with_property_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_type = Some(property_type.into());
        self
    }

    /// Restricts energy scores to `min..=max`.
    #[must_use]
    pub const fn with_energy_range(mut self, min: i64, max: i64) -> Self {
        self.energy_min = min;
        self.energy_max = max;
        self
    }

    /// The property type axis, if set to non-empty text.
    #[must_use]
    pub fn active_property_type(&self) -> Option<&str> {
        self.property_type.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether the energy range is the full 0-100 sentinel, in which case
    /// the range check is skipped entirely (records without a score pass).
    #[must_use]
    pub const fn is_full_range(&self) -> bool {
        self.energy_min == FULL_RANGE_MIN && self.energy_max == FULL_RANGE_MAX
    }

    /// Whether no axis is active.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.priority.is_none() && self.active_property_type().is_none() && self.is_full_range()
    }

    /// Labels for the active axes, e.g. `["Priority: High", "Energy: 50-100"]`.
    #[must_use]
    pub fn applied_filters(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if let Some(priority) = self.priority {
            labels.push(format!("Priority: {priority}"));
        }
        if let Some(property_type) = self.active_property_type() {
            labels.push(format!("Type: {property_type}"));
        }
        if !self.is_full_range() {
            labels.push(format!("Energy: {}-{}", self.energy_min, self.energy_max));
        }
        labels
    }
}

/// Count of records in a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCount {
    /// Tier.
    pub priority: RetrofitPriority,
    /// Number of records.
    pub count: u64,
}

/// Count of records of a single property type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTypeCount {
    /// Property type, or `"Unknown"` for records without one.
    pub property_type: String,
    /// Number of records.
    pub count: u64,
}

/// Summary statistics over a record subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    /// Number of records in the subset.
    pub total: u64,
    /// Per-tier counts over the five recognized tiers, in tier order,
    /// zero-filled.
    pub by_priority: Vec<PriorityCount>,
    /// Per-type counts in discovery order.
    pub by_property_type: Vec<PropertyTypeCount>,
    /// Mean of energy scores > 0, `None` when no record qualifies.
    pub average_energy_score: Option<f64>,
    /// Mean of retrofit scores > 0, `None` when no record qualifies.
    pub average_retrofit_score: Option<f64>,
    /// Records flagged as needing a retrofit.
    pub needs_retrofit: u64,
}

impl SummaryStatistics {
    /// Count for one tier (0 for unrecognized tiers).
    #[must_use]
    pub fn priority_count(&self, priority: RetrofitPriority) -> u64 {
        self.by_priority
            .iter()
            .find(|c| c.priority == priority)
            .map_or(0, |c| c.count)
    }

    /// Count for one property type.
    #[must_use]
    pub fn property_type_count(&self, property_type: &str) -> u64 {
        self.by_property_type
            .iter()
            .find(|c| c.property_type == property_type)
            .map_or(0, |c| c.count)
    }

    /// Sum of all tier buckets. At most [`Self::total`].
    #[must_use]
    pub fn tier_total(&self) -> u64 {
        self.by_priority.iter().map(|c| c.count).sum()
    }
}

/// Everything the insights overlay shows about a filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInsights {
    /// Records in the filtered subset.
    pub filtered_count: u64,
    /// Records in the full dataset.
    pub total_count: u64,
    /// `filtered_count` as a percentage of `total_count`, one decimal.
    pub percentage: f64,
    /// Labels of the active filters and view.
    pub applied_filters: Vec<String>,
    /// Statistics over the filtered subset.
    pub stats: SummaryStatistics,
    /// Most common property types, most frequent first.
    pub top_property_types: Vec<PropertyTypeCount>,
}

/// Page-level stat widgets computed once over the full dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineStats {
    /// All records.
    pub total: u64,
    /// Records in the `Critical` tier.
    pub critical: u64,
    /// Records in the `High` tier.
    pub high: u64,
    /// Records flagged as needing a retrofit.
    pub needs_retrofit: u64,
    /// Mean energy score rounded to a whole number.
    pub average_energy_score: Option<i64>,
    /// Mean retrofit score rounded to a whole number.
    pub average_retrofit_score: Option<i64>,
}

/// Rounds to one decimal place.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Renders an average for display: one decimal, or [`UNAVAILABLE`].
#[must_use]
pub fn format_average(average: Option<f64>) -> String {
    average.map_or_else(|| UNAVAILABLE.to_string(), |avg| format!("{avg:.1}"))
}
