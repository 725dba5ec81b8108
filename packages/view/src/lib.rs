#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View binder for the retrofit map.
//!
//! [`ViewBinder`] owns all transient UI state (active view, displayed
//! subset, open popup, open insights overlay, embedded dashboard) and
//! exposes it only through named transitions. Each transition composes the
//! filter engine and aggregator and hands the results to a [`ViewSink`],
//! the boundary to whatever actually renders the map.
//!
//! Delays (overlay auto-dismissal, dashboard load timeout) run as
//! [`ScheduledTask`]s that post a [`ViewEvent`] back to the binder. The
//! owner drives them with [`ViewBinder::next_event`] and
//! [`ViewBinder::handle_event`]:
//!
//! ```rust,ignore
//! while let Some(event) = binder.next_event().await {
//!     binder.handle_event(event);
//! }
//! ```
//!
//! Without a tokio runtime the transitions still work, but no delay is
//! armed: overlays stay open until dismissed and dashboard loads never time
//! out.

pub mod binder;
pub mod dashboard;
pub mod geometry;
pub mod overlay;
pub mod popup;
pub mod schedule;
pub mod sink;

pub use binder::{ViewBinder, ViewState};
pub use dashboard::{DashboardEmbed, DashboardState};
pub use geometry::{ScreenPoint, ScreenRect, ScreenSize};
pub use overlay::{DragSession, OverlayId};
pub use popup::{Anchor, BuildingPopup, PopupPlacement, ScoreBand};
pub use schedule::ScheduledTask;
pub use sink::{NullSink, ViewSink};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which preset (or custom) view the map is showing.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ActiveView {
    /// Every building.
    #[default]
    All,
    /// `Critical` and `High` tier buildings.
    RetrofitCandidates,
    /// Buildings matching user-supplied criteria.
    CustomFilter,
}

impl ActiveView {
    /// Label listed among the applied filters in the insights overlay.
    #[must_use]
    pub const fn insights_label(self) -> Option<&'static str> {
        match self {
            Self::RetrofitCandidates => Some("Retrofit Candidates"),
            Self::All | Self::CustomFilter => None,
        }
    }
}

/// Deferred notifications posted back to the binder by scheduled tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// The auto-dismiss delay of an insights overlay elapsed.
    InsightsExpired {
        /// Overlay the delay was scheduled for.
        overlay: OverlayId,
    },
    /// A dashboard load attempt did not finish in time.
    DashboardTimedOut {
        /// Attempt the timeout was scheduled for.
        attempt: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_view_names() {
        assert_eq!(ActiveView::All.to_string(), "all");
        assert_eq!(
            ActiveView::RetrofitCandidates.to_string(),
            "retrofit-candidates"
        );
        assert_eq!(
            "custom-filter".parse::<ActiveView>().ok(),
            Some(ActiveView::CustomFilter)
        );
        assert!("everything".parse::<ActiveView>().is_err());
    }
}
