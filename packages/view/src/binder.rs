//! The view binder state machine.

use std::sync::Arc;

use chrono::Datelike as _;
use retrofit_map_analytics::{filter, summary};
use retrofit_map_analytics_models::{FilterCriteria, FilterInsights};
use retrofit_map_building_models::BuildingRecord;
use retrofit_map_config::{AppConfig, DashboardConfig, MapConfig, OverlayConfig};
use retrofit_map_spatial::{BoundingBox, ClusterConfig, ClusteredSource, FitRequest};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    ActiveView, BuildingPopup, DashboardEmbed, DashboardState, DragSession, OverlayId,
    PopupPlacement, ScheduledTask, ScreenPoint, ScreenRect, ScreenSize, ViewEvent, ViewSink,
};

/// The insights overlay currently on screen.
#[derive(Debug)]
struct OpenOverlay {
    id: OverlayId,
    insights: FilterInsights,
    dismissal: Option<ScheduledTask>,
    drag: Option<DragSession>,
}

/// Transient UI state. Read-only from outside the binder.
#[derive(Debug, Default)]
pub struct ViewState {
    active_view: ActiveView,
    criteria: FilterCriteria,
    displayed: Vec<BuildingRecord>,
    open_popup: Option<i64>,
    overlay: Option<OpenOverlay>,
    full_bounds: Option<BoundingBox>,
    clustering: bool,
}

impl ViewState {
    /// The view control currently highlighted.
    #[must_use]
    pub const fn active_view(&self) -> ActiveView {
        self.active_view
    }

    /// Criteria behind the displayed subset (default unless a custom filter
    /// is active).
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The subset currently on the map.
    #[must_use]
    pub fn displayed(&self) -> &[BuildingRecord] {
        &self.displayed
    }

    /// Id of the building whose popup is open.
    #[must_use]
    pub const fn open_popup(&self) -> Option<i64> {
        self.open_popup
    }

    /// Id of the open insights overlay.
    #[must_use]
    pub fn open_overlay(&self) -> Option<OverlayId> {
        self.overlay.as_ref().map(|o| o.id)
    }

    /// Content of the open insights overlay.
    #[must_use]
    pub fn open_insights(&self) -> Option<&FilterInsights> {
        self.overlay.as_ref().map(|o| &o.insights)
    }

    /// Whether the overlay is being dragged.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.overlay.as_ref().is_some_and(|o| o.drag.is_some())
    }

    /// Padded bounds of the full dataset, fixed at initialization.
    #[must_use]
    pub const fn full_bounds(&self) -> Option<BoundingBox> {
        self.full_bounds
    }

    /// Whether cluster layers are shown.
    #[must_use]
    pub const fn clustering_enabled(&self) -> bool {
        self.clustering
    }
}

/// Binds the immutable dataset to a [`ViewSink`].
///
/// Every public transition replaces the displayed subset completely before
/// it returns. Delayed work comes back through [`Self::next_event`] and must
/// be fed to [`Self::handle_event`].
pub struct ViewBinder<S: ViewSink> {
    sink: S,
    records: Arc<[BuildingRecord]>,
    map: MapConfig,
    overlay: OverlayConfig,
    state: ViewState,
    dashboard: DashboardEmbed,
    next_overlay: u64,
    events_tx: UnboundedSender<ViewEvent>,
    events_rx: UnboundedReceiver<ViewEvent>,
}

impl<S: ViewSink> ViewBinder<S> {
    /// Creates a binder over `records`. Nothing is pushed to the sink until
    /// [`Self::initialize`].
    #[must_use]
    pub fn new(sink: S, records: Arc<[BuildingRecord]>, config: &AppConfig) -> Self {
        Self::with_sections(
            sink,
            records,
            config.map.clone(),
            config.overlay.clone(),
            &config.dashboard,
        )
    }

    /// Creates a binder from individual config sections.
    #[must_use]
    pub fn with_sections(
        sink: S,
        records: Arc<[BuildingRecord]>,
        map: MapConfig,
        overlay: OverlayConfig,
        dashboard: &DashboardConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            sink,
            records,
            map,
            overlay,
            state: ViewState {
                clustering: true,
                ..ViewState::default()
            },
            dashboard: DashboardEmbed::new(dashboard.load_timeout(), events_tx.clone()),
            next_overlay: 0,
            events_tx,
            events_rx,
        }
    }

    /// Read-only view of the transient UI state.
    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// The sink every change is pushed to.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Constrains and fits the map to the full dataset, fills the headline
    /// widgets and shows every building.
    ///
    /// When no record can be placed the bounds steps are skipped.
    pub fn initialize(&mut self) {
        self.state.full_bounds = retrofit_map_spatial::compute_bounds(&self.records);

        if let Some(bounds) = self.state.full_bounds {
            self.sink.set_max_bounds(&bounds);
            self.sink
                .fit_bounds(&FitRequest::new(bounds, self.map.initial_fit));
        }

        self.sink.update_headline(&summary::headline(&self.records));
        self.sink.set_clustering(self.state.clustering);
        self.show_everything();

        log::info!("View ready with {} buildings", self.records.len());
    }

    /// Shows every building and resets the filter inputs.
    pub fn show_all(&mut self) {
        log::debug!("Showing all buildings");
        self.show_everything();
    }

    /// Shows only `Critical` and `High` buildings, resets the filter inputs
    /// and opens an insights overlay for the subset.
    pub fn show_retrofit_candidates(&mut self) {
        self.sink.reset_filter_inputs();
        self.state.criteria = FilterCriteria::default();

        let candidates = filter::retrofit_candidates(&self.records);
        self.display(candidates, ActiveView::RetrofitCandidates);
        self.open_insights(ActiveView::RetrofitCandidates.insights_label());
    }

    /// Shows the buildings matching `criteria` and opens an insights overlay
    /// for them.
    pub fn apply_filters(&mut self, criteria: FilterCriteria) {
        let filtered = filter::apply(&self.records, &criteria);
        self.state.criteria = criteria;
        self.display(filtered, ActiveView::CustomFilter);
        self.open_insights(None);
    }

    /// Same as [`Self::show_all`].
    pub fn clear_filters(&mut self) {
        log::debug!("Clearing all filters");
        self.show_everything();
    }

    /// Fits the camera to the displayed buildings, or to the full dataset
    /// when none of them can be placed. Returns the request sent, if any.
    pub fn fit_to_current_view(&mut self) -> Option<FitRequest> {
        let fit = match retrofit_map_spatial::extent(&self.state.displayed) {
            Some(extent) => FitRequest::new(extent, self.map.view_fit),
            None => FitRequest::new(self.state.full_bounds?, self.map.initial_fit),
        };
        self.sink.fit_bounds(&fit);
        Some(fit)
    }

    /// Opens the detail popup for `record`, clicked at `click` inside a map
    /// of size `container`. Any popup already open is closed first.
    pub fn open_popup(&mut self, record: &BuildingRecord, click: ScreenPoint, container: ScreenSize) {
        self.close_popup();

        let placement = PopupPlacement::choose(
            click,
            container,
            ScreenSize::new(self.map.popup_width_px, self.map.popup_height_px),
        );
        let popup = BuildingPopup::from_record(record, chrono::Local::now().year(), placement);

        self.state.open_popup = Some(record.id);
        self.sink.show_popup(&popup);
    }

    /// Closes the open popup. Returns whether one was open.
    pub fn close_popup(&mut self) -> bool {
        match self.state.open_popup.take() {
            Some(id) => {
                self.sink.close_popup(id);
                true
            }
            None => false,
        }
    }

    /// Closes the insights overlay and cancels its auto-dismissal. Returns
    /// whether one was open.
    pub fn dismiss_insights(&mut self) -> bool {
        match self.state.overlay.take() {
            Some(overlay) => {
                if let Some(dismissal) = &overlay.dismissal {
                    dismissal.cancel();
                }
                self.sink.close_insights(overlay.id);
                true
            }
            None => false,
        }
    }

    /// Starts dragging the overlay by its header. Does nothing when no
    /// overlay is open. The auto-dismissal keeps running.
    pub fn begin_drag(&mut self, pointer: ScreenPoint, overlay_origin: ScreenPoint) -> bool {
        let padding = self.overlay.drag_padding_px;
        match self.state.overlay.as_mut() {
            Some(overlay) => {
                overlay.drag = Some(DragSession::begin(pointer, overlay_origin, padding));
                true
            }
            None => false,
        }
    }

    /// Moves the dragged overlay, clamped inside `container`. Returns the new
    /// position, or `None` when no drag is in progress.
    pub fn drag_to(
        &mut self,
        pointer: ScreenPoint,
        container: ScreenRect,
        overlay_size: ScreenSize,
    ) -> Option<ScreenPoint> {
        let overlay = self.state.overlay.as_ref()?;
        let position = overlay
            .drag?
            .position_for(pointer, container, overlay_size);
        self.sink.move_insights(overlay.id, position);
        Some(position)
    }

    /// Ends the current drag, if any.
    pub fn end_drag(&mut self) {
        if let Some(overlay) = self.state.overlay.as_mut() {
            overlay.drag = None;
        }
    }

    /// Shows or hides cluster layers.
    pub fn set_clustering(&mut self, enabled: bool) {
        self.state.clustering = enabled;
        self.sink.set_clustering(enabled);
    }

    /// A cluster marker at (`longitude`, `latitude`) was clicked. The sink
    /// looks up the cluster's expansion zoom and eases the camera there.
    pub fn expand_cluster(&mut self, cluster_id: u64, longitude: f64, latitude: f64) {
        if !(longitude.is_finite() && latitude.is_finite()) {
            log::debug!("Ignoring click on cluster {cluster_id} without a usable center");
            return;
        }
        self.sink.expand_cluster(cluster_id, (longitude, latitude));
    }

    /// Starts loading the embedded dashboard.
    pub fn start_dashboard(&mut self) {
        let state = self.dashboard.start();
        self.sink.set_dashboard_state(state);
    }

    /// The embedded dashboard finished loading.
    pub fn dashboard_loaded(&mut self) {
        let state = self.dashboard.on_load();
        self.sink.set_dashboard_state(state);
    }

    /// The embedded dashboard failed to load.
    pub fn dashboard_failed(&mut self) {
        let state = self.dashboard.on_error();
        self.sink.set_dashboard_state(state);
    }

    /// The user pressed retry on the dashboard fallback.
    pub fn retry_dashboard(&mut self) {
        let state = self.dashboard.retry();
        self.sink.set_dashboard_state(state);
    }

    /// Connectivity came back.
    pub fn network_online(&mut self) {
        let state = self.dashboard.on_online();
        self.sink.set_dashboard_state(state);
    }

    /// Current state of the embedded dashboard.
    #[must_use]
    pub const fn dashboard_state(&self) -> DashboardState {
        self.dashboard.state()
    }

    /// Waits for the next delayed event.
    pub async fn next_event(&mut self) -> Option<ViewEvent> {
        self.events_rx.recv().await
    }

    /// Returns a delayed event if one is already queued.
    pub fn try_next_event(&mut self) -> Option<ViewEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Applies a delayed event. Events for an overlay or dashboard attempt
    /// that is no longer current are ignored.
    pub fn handle_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::InsightsExpired { overlay } => {
                if self.state.open_overlay() == Some(overlay) {
                    log::debug!("Auto-dismissing {overlay}");
                    self.dismiss_insights();
                } else {
                    log::debug!("Ignoring expiry of {overlay}, no longer open");
                }
            }
            ViewEvent::DashboardTimedOut { attempt } => {
                let before = self.dashboard.state();
                let after = self.dashboard.on_timeout(attempt);
                if before != after {
                    self.sink.set_dashboard_state(after);
                }
            }
        }
    }

    fn show_everything(&mut self) {
        self.sink.reset_filter_inputs();
        self.state.criteria = FilterCriteria::default();
        self.display(self.records.to_vec(), ActiveView::All);
    }

    fn display(&mut self, records: Vec<BuildingRecord>, view: ActiveView) {
        let source = ClusteredSource::new(
            &records,
            ClusterConfig {
                enabled: self.state.clustering,
                ..ClusterConfig::from(&self.map)
            },
        );
        self.sink.set_source(&source);
        self.state.displayed = records;

        self.state.active_view = view;
        self.sink.set_active_view(view);
    }

    fn open_insights(&mut self, view_label: Option<&str>) {
        self.dismiss_insights();

        let insights = summary::insights(
            &self.state.displayed,
            self.records.len(),
            &self.state.criteria,
            view_label,
            self.overlay.top_property_types,
        );

        self.next_overlay += 1;
        let id = OverlayId(self.next_overlay);
        let dismissal = ScheduledTask::post_after(
            self.overlay.insights_dismiss(),
            self.events_tx.clone(),
            ViewEvent::InsightsExpired { overlay: id },
        );

        self.sink.show_insights(id, &insights);
        self.state.overlay = Some(OpenOverlay {
            id,
            insights,
            dismissal,
            drag: None,
        });
    }
}
