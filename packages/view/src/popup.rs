//! Building detail popup view-model and placement.

use retrofit_map_analytics_models::UNAVAILABLE;
use retrofit_map_building_models::{BuildingRecord, DEFAULT_PRIORITY_COLOR};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::{ScreenPoint, ScreenSize};

const NAME_MAX_CHARS: usize = 35;
const ADDRESS_MAX_CHARS: usize = 40;
const TYPE_MAX_CHARS: usize = 20;

/// Offset between the clicked point and the popup's anchor, in pixels.
const ANCHOR_OFFSET: f64 = 10.0;

/// Qualitative band of a score, used to color it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScoreBand {
    /// Red.
    Poor,
    /// Amber.
    Fair,
    /// Green.
    Good,
}

impl ScoreBand {
    /// Energy scores: higher is better.
    #[must_use]
    pub const fn for_energy_score(score: i64) -> Self {
        if score < 50 {
            Self::Poor
        } else if score > 75 {
            Self::Good
        } else {
            Self::Fair
        }
    }

    /// Retrofit scores: higher means more work needed.
    #[must_use]
    pub fn for_retrofit_score(score: f64) -> Self {
        if score > 60.0 {
            Self::Poor
        } else if score < 30.0 {
            Self::Good
        } else {
            Self::Fair
        }
    }

    /// Hex color for the score text.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Poor => "#ef4444",
            Self::Fair => "#f59e0b",
            Self::Good => "#10b981",
        }
    }
}

/// Which corner of the popup sits on the clicked point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Anchor {
    /// Popup opens up and to the right of the click.
    BottomLeft,
    /// Popup opens up and to the left.
    BottomRight,
    /// Popup opens down and to the right.
    TopLeft,
    /// Popup opens down and to the left.
    TopRight,
}

/// Anchor and pixel offset for a popup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopupPlacement {
    /// Corner placed on the clicked point.
    pub anchor: Anchor,
    /// `(x, y)` offset in pixels.
    pub offset: (f64, f64),
}

impl PopupPlacement {
    /// Picks an anchor so a popup of `popup` size opened at `click` stays
    /// inside a map of `container` size.
    ///
    /// The default is bottom-left, offset `(10, -10)`. The anchor flips to
    /// the right side when the popup would overflow the right edge and to
    /// the top when it would overflow the bottom edge.
    #[must_use]
    pub fn choose(click: ScreenPoint, container: ScreenSize, popup: ScreenSize) -> Self {
        let flip_x = click.x + popup.width > container.width;
        let flip_y = click.y + popup.height > container.height;

        let anchor = match (flip_y, flip_x) {
            (false, false) => Anchor::BottomLeft,
            (false, true) => Anchor::BottomRight,
            (true, false) => Anchor::TopLeft,
            (true, true) => Anchor::TopRight,
        };
        let offset = (
            if flip_x { -ANCHOR_OFFSET } else { ANCHOR_OFFSET },
            if flip_y { ANCHOR_OFFSET } else { -ANCHOR_OFFSET },
        );

        Self { anchor, offset }
    }
}

/// Everything a building detail popup shows, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingPopup {
    /// Record id, used to close the popup later.
    pub building_id: i64,
    /// Property name, truncated to 35 characters.
    pub name: String,
    /// Street address, truncated to 40 characters.
    pub address: String,
    /// Primary property type, truncated to 20 characters.
    pub property_type: String,
    /// Energy score, `None` when absent or zero.
    pub energy_score: Option<i64>,
    /// Color band for the energy score.
    pub energy_band: Option<ScoreBand>,
    /// Retrofit score rounded to a whole number, `None` when absent or zero.
    pub retrofit_score: Option<i64>,
    /// Color band for the retrofit score.
    pub retrofit_band: Option<ScoreBand>,
    /// Tier name, or `"Unknown"`.
    pub priority_label: String,
    /// Legend color of the tier.
    pub priority_color: String,
    /// Whether the record is flagged for retrofit.
    pub needs_retrofit: bool,
    /// Building age in years, `None` when the build year is unknown.
    pub age_years: Option<i32>,
    /// Chicago energy rating, or `N/A`.
    pub chicago_rating: String,
    /// Site EUI with units, e.g. `"84 kBtu/sq ft"`, or `N/A`.
    pub site_eui: String,
    /// GHG intensity with units, or `N/A`.
    pub ghg_intensity: String,
    /// Where the popup sits relative to the click.
    pub placement: PopupPlacement,
}

impl BuildingPopup {
    /// Builds the popup for `record` as of `current_year`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_record(record: &BuildingRecord, current_year: i32, placement: PopupPlacement) -> Self {
        let energy_score = record.qualifying_energy_score();
        let retrofit = record.qualifying_retrofit_score();
        let tier = record.tier();

        Self {
            building_id: record.id,
            name: truncate(record.property_name.as_deref().unwrap_or("Building"), NAME_MAX_CHARS),
            address: truncate(
                record.address.as_deref().unwrap_or("Address not available"),
                ADDRESS_MAX_CHARS,
            ),
            property_type: truncate(
                record.primary_property_type.as_deref().unwrap_or(UNAVAILABLE),
                TYPE_MAX_CHARS,
            ),
            energy_score,
            energy_band: energy_score.map(ScoreBand::for_energy_score),
            retrofit_score: retrofit.map(|score| score.round() as i64),
            retrofit_band: retrofit.map(ScoreBand::for_retrofit_score),
            priority_label: tier.map_or_else(|| "Unknown".to_string(), |p| p.to_string()),
            priority_color: tier
                .map_or(DEFAULT_PRIORITY_COLOR, |p| p.color())
                .to_string(),
            needs_retrofit: record.is_flagged_for_retrofit(),
            age_years: record.age_in(current_year),
            chicago_rating: record
                .chicago_energy_rating
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| UNAVAILABLE.to_string()),
            site_eui: record
                .site_eui_kbtu_sq_ft
                .filter(|v| *v > 0.0)
                .map_or_else(
                    || UNAVAILABLE.to_string(),
                    |v| format!("{} kBtu/sq ft", v.round()),
                ),
            ghg_intensity: record
                .ghg_intensity_kg_co2e_sq_ft
                .filter(|v| *v > 0.0)
                .map_or_else(|| UNAVAILABLE.to_string(), |v| format!("{v:.2} kg/sq ft")),
            placement,
        }
    }

    /// Energy score text, or `N/A`.
    #[must_use]
    pub fn energy_score_label(&self) -> String {
        self.energy_score
            .map_or_else(|| UNAVAILABLE.to_string(), |s| s.to_string())
    }

    /// Retrofit score text, or `N/A`.
    #[must_use]
    pub fn retrofit_score_label(&self) -> String {
        self.retrofit_score
            .map_or_else(|| UNAVAILABLE.to_string(), |s| s.to_string())
    }

    /// Age text, e.g. `"54 years"`, or `"Unknown"`.
    #[must_use]
    pub fn age_label(&self) -> String {
        self.age_years
            .map_or_else(|| "Unknown".to_string(), |age| format!("{age} years"))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut short: String = text.chars().take(max_chars).collect();
        short.push_str("...");
        short
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use retrofit_map_building_models::RetrofitPriority;

    use super::*;

    const CONTAINER: ScreenSize = ScreenSize::new(1000.0, 800.0);
    const POPUP: ScreenSize = ScreenSize::new(300.0, 400.0);

    fn placement() -> PopupPlacement {
        PopupPlacement::choose(ScreenPoint::new(10.0, 10.0), CONTAINER, POPUP)
    }

    #[test]
    fn energy_bands() {
        assert_eq!(ScoreBand::for_energy_score(49), ScoreBand::Poor);
        assert_eq!(ScoreBand::for_energy_score(50), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_energy_score(75), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_energy_score(76), ScoreBand::Good);
    }

    #[test]
    fn retrofit_bands() {
        assert_eq!(ScoreBand::for_retrofit_score(61.0), ScoreBand::Poor);
        assert_eq!(ScoreBand::for_retrofit_score(60.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_retrofit_score(30.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_retrofit_score(29.9), ScoreBand::Good);
    }

    #[test]
    fn placement_defaults_to_bottom_left() {
        let placement = placement();
        assert_eq!(placement.anchor, Anchor::BottomLeft);
        assert_eq!(placement.offset, (10.0, -10.0));
        assert_eq!(placement.anchor.to_string(), "bottom-left");
    }

    #[test]
    fn placement_flips_near_edges() {
        let right = PopupPlacement::choose(ScreenPoint::new(800.0, 10.0), CONTAINER, POPUP);
        assert_eq!(right.anchor, Anchor::BottomRight);
        assert_eq!(right.offset, (-10.0, -10.0));

        let bottom = PopupPlacement::choose(ScreenPoint::new(10.0, 500.0), CONTAINER, POPUP);
        assert_eq!(bottom.anchor, Anchor::TopLeft);
        assert_eq!(bottom.offset, (10.0, 10.0));

        let corner = PopupPlacement::choose(ScreenPoint::new(900.0, 700.0), CONTAINER, POPUP);
        assert_eq!(corner.anchor, Anchor::TopRight);
        assert_eq!(corner.offset, (-10.0, 10.0));
    }

    #[test]
    fn popup_formats_full_record() {
        let record = BuildingRecord {
            id: 9,
            property_name: Some("Willis Tower".to_string()),
            address: Some("233 S Wacker Dr".to_string()),
            primary_property_type: Some("Office".to_string()),
            retrofit_priority: Some(RetrofitPriority::High),
            energy_star_score: Some(82),
            retrofit_score: Some(64.6),
            year_built: Some(1973),
            site_eui_kbtu_sq_ft: Some(98.4),
            ghg_intensity_kg_co2e_sq_ft: Some(7.456),
            needs_retrofit: Some(true),
            chicago_energy_rating: Some("3".to_string()),
            ..BuildingRecord::default()
        };

        let popup = BuildingPopup::from_record(&record, 2024, placement());

        assert_eq!(popup.building_id, 9);
        assert_eq!(popup.name, "Willis Tower");
        assert_eq!(popup.energy_score_label(), "82");
        assert_eq!(popup.energy_band, Some(ScoreBand::Good));
        assert_eq!(popup.retrofit_score, Some(65));
        assert_eq!(popup.retrofit_band, Some(ScoreBand::Poor));
        assert_eq!(popup.priority_label, "High");
        assert_eq!(popup.priority_color, RetrofitPriority::High.color());
        assert!(popup.needs_retrofit);
        assert_eq!(popup.age_label(), "51 years");
        assert_eq!(popup.chicago_rating, "3");
        assert_eq!(popup.site_eui, "98 kBtu/sq ft");
        assert_eq!(popup.ghg_intensity, "7.46 kg/sq ft");
    }

    #[test]
    fn popup_fills_missing_values() {
        let record = BuildingRecord {
            energy_star_score: Some(0),
            retrofit_priority: Some(RetrofitPriority::Unknown),
            ..BuildingRecord::default()
        };

        let popup = BuildingPopup::from_record(&record, 2024, placement());

        assert_eq!(popup.name, "Building");
        assert_eq!(popup.address, "Address not available");
        assert_eq!(popup.property_type, "N/A");
        assert_eq!(popup.energy_score_label(), "N/A");
        assert_eq!(popup.energy_band, None);
        assert_eq!(popup.retrofit_score_label(), "N/A");
        assert_eq!(popup.priority_label, "Unknown");
        assert_eq!(popup.priority_color, DEFAULT_PRIORITY_COLOR);
        assert!(!popup.needs_retrofit);
        assert_eq!(popup.age_label(), "Unknown");
        assert_eq!(popup.chicago_rating, "N/A");
        assert_eq!(popup.site_eui, "N/A");
        assert_eq!(popup.ghg_intensity, "N/A");
    }

    #[test]
    fn long_text_is_truncated() {
        let record = BuildingRecord {
            property_name: Some("A".repeat(36)),
            address: Some("B".repeat(40)),
            primary_property_type: Some("Mixed Use Property Type".to_string()),
            ..BuildingRecord::default()
        };

        let popup = BuildingPopup::from_record(&record, 2024, placement());

        assert_eq!(popup.name, format!("{}...", "A".repeat(35)));
        assert_eq!(popup.address, "B".repeat(40));
        assert_eq!(popup.property_type, "Mixed Use Property T...");
    }
}
