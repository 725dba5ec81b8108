//! Rendering boundary for the view binder.
//!
//! Defines a [`ViewSink`] trait that decouples the binder's state machine
//! from any specific map SDK or page. The binder never builds markup; it
//! hands structured values to the sink and the sink renders them.

use retrofit_map_analytics_models::{FilterInsights, HeadlineStats};
use retrofit_map_spatial::{BoundingBox, ClusteredSource, FitRequest};

use crate::{ActiveView, BuildingPopup, DashboardState, OverlayId, ScreenPoint};

/// Receives every visible change the binder makes.
///
/// Implementations must be `Send + Sync` so a binder can be moved onto a
/// spawned tokio task.
pub trait ViewSink: Send + Sync {
    /// Constrain panning to `bounds`.
    fn set_max_bounds(&self, bounds: &BoundingBox);

    /// Move the camera to fit a box.
    fn fit_bounds(&self, fit: &FitRequest);

    /// Replace the building source data.
    fn set_source(&self, source: &ClusteredSource);

    /// Highlight the active view control.
    fn set_active_view(&self, view: ActiveView);

    /// Clear the tier, type and energy range inputs.
    fn reset_filter_inputs(&self);

    /// Refresh the page-level stat widgets.
    fn update_headline(&self, stats: &HeadlineStats);

    /// Show an insights overlay.
    fn show_insights(&self, overlay: OverlayId, insights: &FilterInsights);

    /// Remove an insights overlay.
    fn close_insights(&self, overlay: OverlayId);

    /// Move an insights overlay to an absolute position.
    fn move_insights(&self, overlay: OverlayId, position: ScreenPoint);

    /// Show a building detail popup.
    fn show_popup(&self, popup: &BuildingPopup);

    /// Remove the popup for a building.
    fn close_popup(&self, building_id: i64);

    /// Show or hide cluster layers.
    fn set_clustering(&self, enabled: bool);

    /// Zoom into a clicked cluster. `center` is its `(longitude, latitude)`;
    /// the map looks up the zoom at which the cluster splits.
    fn expand_cluster(&self, cluster_id: u64, center: (f64, f64));

    /// Reflect the embedded dashboard's loading state.
    fn set_dashboard_state(&self, state: DashboardState);
}

/// A no-op implementation of [`ViewSink`].
///
/// Useful for headless use and tests that only inspect binder state.
pub struct NullSink;

impl ViewSink for NullSink {
    fn set_max_bounds(&self, _bounds: &BoundingBox) {}
    fn fit_bounds(&self, _fit: &FitRequest) {}
    fn set_source(&self, _source: &ClusteredSource) {}
    fn set_active_view(&self, _view: ActiveView) {}
    fn reset_filter_inputs(&self) {}
    fn update_headline(&self, _stats: &HeadlineStats) {}
    fn show_insights(&self, _overlay: OverlayId, _insights: &FilterInsights) {}
    fn close_insights(&self, _overlay: OverlayId) {}
    fn move_insights(&self, _overlay: OverlayId, _position: ScreenPoint) {}
    fn show_popup(&self, _popup: &BuildingPopup) {}
    fn close_popup(&self, _building_id: i64) {}
    fn set_clustering(&self, _enabled: bool) {}
    fn expand_cluster(&self, _cluster_id: u64, _center: (f64, f64)) {}
    fn set_dashboard_state(&self, _state: DashboardState) {}
}
