#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geographic bounds and map sources for building records.
//!
//! Computes the padded bounding box that constrains panning and drives the
//! initial camera fit, and converts record subsets into the clustered
//! `GeoJSON` source the map renders. Records without finite coordinates are
//! skipped here (they cannot be placed) but are otherwise untouched.

use geo::{BoundingRect, MultiPoint, Point};
use geojson::{Feature, FeatureCollection, Geometry, feature::Id};
use retrofit_map_building_models::BuildingRecord;
use retrofit_map_config::{FitConfig, MapConfig};
use serde::{Deserialize, Serialize};

/// Fraction of each axis span added on both ends of the raw extent.
pub const BOUNDS_PADDING_RATIO: f64 = 0.05;

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// `(longitude, latitude)` of the southwest corner.
    #[must_use]
    pub const fn southwest(&self) -> (f64, f64) {
        (self.west, self.south)
    }

    /// `(longitude, latitude)` of the northeast corner.
    #[must_use]
    pub const fn northeast(&self) -> (f64, f64) {
        (self.east, self.north)
    }

    /// Longitude span.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Latitude span.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Grows each axis by `ratio` of its span on both ends.
    #[must_use]
    pub fn padded(&self, ratio: f64) -> Self {
        let lng_padding = self.width() * ratio;
        let lat_padding = self.height() * ratio;
        Self::new(
            self.west - lng_padding,
            self.south - lat_padding,
            self.east + lng_padding,
            self.north + lat_padding,
        )
    }

    /// Whether `other` lies entirely within this box (edges inclusive).
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.west <= other.west
            && self.south <= other.south
            && self.east >= other.east
            && self.north >= other.north
    }

    /// Whether the point lies within this box (edges inclusive).
    #[must_use]
    pub fn contains_point(&self, lng: f64, lat: f64) -> bool {
        (self.west..=self.east).contains(&lng) && (self.south..=self.north).contains(&lat)
    }
}

/// The raw min/max extent of all records with finite coordinates.
///
/// Returns `None` when no record can be placed.
#[must_use]
pub fn extent(records: &[BuildingRecord]) -> Option<BoundingBox> {
    let points: MultiPoint<f64> = records
        .iter()
        .filter_map(BuildingRecord::coordinates)
        .map(|(lng, lat)| Point::new(lng, lat))
        .collect();

    points
        .bounding_rect()
        .map(|rect| BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
}

/// The padded dataset bounds used to constrain panning and for the initial
/// fit: raw extent first, then [`BOUNDS_PADDING_RATIO`] of each span added
/// on both ends.
///
/// Returns `None` for an empty input or when no record has finite
/// coordinates; callers skip fitting in that case.
#[must_use]
pub fn compute_bounds(records: &[BuildingRecord]) -> Option<BoundingBox> {
    let bounds = extent(records).map(|raw| raw.padded(BOUNDS_PADDING_RATIO));
    if bounds.is_none() {
        log::debug!(
            "No placeable records among {}, skipping bounds",
            records.len()
        );
    }
    bounds
}

/// A camera fit request handed to the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitRequest {
    /// Box to fit.
    pub bounds: BoundingBox,
    /// Screen padding in pixels.
    pub padding_px: u32,
    /// Zoom ceiling.
    pub max_zoom: u8,
}

impl FitRequest {
    /// Builds a fit request from configured fit parameters.
    #[must_use]
    pub const fn new(bounds: BoundingBox, fit: FitConfig) -> Self {
        Self {
            bounds,
            padding_px: fit.padding_px,
            max_zoom: fit.max_zoom,
        }
    }
}

/// Converts records into point features, one per record with finite
/// coordinates. Feature properties are the full record.
#[must_use]
pub fn feature_collection(records: &[BuildingRecord]) -> FeatureCollection {
    let features = records
        .iter()
        .filter_map(|record| {
            let (lng, lat) = record.coordinates()?;
            let properties = match serde_json::to_value(record) {
                Ok(serde_json::Value::Object(map)) => Some(map),
                Ok(_) => None,
                Err(e) => {
                    log::warn!("Failed to serialize building {}: {e}", record.id);
                    None
                }
            };

            Some(Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::Point(vec![lng, lat]))),
                id: Some(Id::Number(record.id.into())),
                properties,
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Clustering parameters for the building source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Whether points are clustered at all.
    pub enabled: bool,
    /// Cluster radius in pixels.
    pub radius: u32,
    /// Zoom level past which points are no longer clustered.
    pub max_zoom: u8,
}

impl From<&MapConfig> for ClusterConfig {
    fn from(config: &MapConfig) -> Self {
        Self {
            enabled: true,
            radius: config.cluster_radius,
            max_zoom: config.cluster_max_zoom,
        }
    }
}

/// A clustered `GeoJSON` map source, serialized in the shape the map SDK
/// expects for `addSource`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteredSource {
    /// Always `"geojson"`.
    #[serde(rename = "type")]
    pub source_type: &'static str,
    /// Point features.
    pub data: FeatureCollection,
    /// Whether clustering is on.
    pub cluster: bool,
    /// Zoom level past which points are no longer clustered.
    pub cluster_max_zoom: u8,
    /// Cluster radius in pixels.
    pub cluster_radius: u32,
}

impl ClusteredSource {
    /// Builds a source from records and clustering parameters.
    #[must_use]
    pub fn new(records: &[BuildingRecord], cluster: ClusterConfig) -> Self {
        Self {
            source_type: "geojson",
            data: feature_collection(records),
            cluster: cluster.enabled,
            cluster_max_zoom: cluster.max_zoom,
            cluster_radius: cluster.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lng: f64, lat: f64) -> BuildingRecord {
        BuildingRecord {
            latitude: Some(lat),
            longitude: Some(lng),
            ..BuildingRecord::default()
        }
    }

    #[test]
    fn empty_input_has_no_bounds() {
        assert_eq!(compute_bounds(&[]), None);
    }

    #[test]
    fn records_without_coordinates_have_no_bounds() {
        let records = vec![
            BuildingRecord::default(),
            BuildingRecord {
                latitude: Some(f64::NAN),
                longitude: Some(-87.6),
                ..BuildingRecord::default()
            },
            BuildingRecord {
                latitude: Some(41.8),
                longitude: Some(f64::INFINITY),
                ..BuildingRecord::default()
            },
        ];
        assert_eq!(compute_bounds(&records), None);
    }

    #[test]
    fn bounds_pad_five_percent_of_each_span() {
        let records = vec![at(-88.0, 41.0), at(-87.0, 42.0), BuildingRecord::default()];
        let bounds = compute_bounds(&records).unwrap();

        assert!((bounds.west - -88.05).abs() < 1e-9);
        assert!((bounds.east - -86.95).abs() < 1e-9);
        assert!((bounds.south - 40.95).abs() < 1e-9);
        assert!((bounds.north - 42.05).abs() < 1e-9);
    }

    #[test]
    fn padded_bounds_contain_raw_extent() {
        let records = vec![at(-87.7, 41.9), at(-87.6, 41.8), at(-87.65, 41.85)];
        let raw = extent(&records).unwrap();
        let bounds = compute_bounds(&records).unwrap();

        let (sw_lng, sw_lat) = bounds.southwest();
        let (ne_lng, ne_lat) = bounds.northeast();
        assert!(sw_lng <= ne_lng);
        assert!(sw_lat <= ne_lat);
        assert!(bounds.contains(&raw));
        for record in &records {
            let (lng, lat) = record.coordinates().unwrap();
            assert!(bounds.contains_point(lng, lat));
        }
    }

    #[test]
    fn single_point_bounds_are_degenerate() {
        let bounds = compute_bounds(&[at(-87.6, 41.8)]).unwrap();
        assert_eq!(bounds, BoundingBox::new(-87.6, 41.8, -87.6, 41.8));
    }

    #[test]
    fn features_skip_unplaceable_records() {
        let mut placed = at(-87.6, 41.8);
        placed.id = 5;
        placed.property_name = Some("Placed".to_string());
        let records = vec![placed, BuildingRecord::default()];

        let collection = feature_collection(&records);

        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(
            feature.geometry.as_ref().map(|g| &g.value),
            Some(&geojson::Value::Point(vec![-87.6, 41.8]))
        );
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["property_name"], "Placed");
        assert_eq!(properties["id"], 5);
    }

    #[test]
    fn clustered_source_serializes_map_shape() {
        let source = ClusteredSource::new(
            &[at(-87.6, 41.8)],
            ClusterConfig::from(&MapConfig::default()),
        );
        let json = serde_json::to_value(&source).unwrap();

        assert_eq!(json["type"], "geojson");
        assert_eq!(json["cluster"], true);
        assert_eq!(json["clusterMaxZoom"], 14);
        assert_eq!(json["clusterRadius"], 50);
        assert_eq!(json["data"]["type"], "FeatureCollection");
    }
}
