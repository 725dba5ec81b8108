//! HTTP handler functions for the retrofit map API.

use actix_web::{HttpResponse, web};
use retrofit_map_analytics_models::{
    FULL_RANGE_MAX, FULL_RANGE_MIN, FilterCriteria, TOP_PROPERTY_TYPES,
};
use retrofit_map_building_models::{BuildingRecord, RetrofitPriority};
use retrofit_map_dataset::DatasetOrigin;
use retrofit_map_server_models::{
    ApiDataset, ApiDatasetOrigin, ApiError, ApiHealth, ApiPriority, BuildingQueryParams,
};
use retrofit_map_spatial::{ClusterConfig, ClusteredSource};
use retrofit_map_view::ActiveView;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/dataset`
///
/// Describes the loaded dataset: where it came from, its bounds and the
/// headline stats.
pub async fn dataset(state: web::Data<AppState>) -> HttpResponse {
    let dataset = &state.dataset;
    let (origin, source, fallback_reason) = match dataset.origin() {
        DatasetOrigin::Fetched { source } => (ApiDatasetOrigin::Fetched, Some(source.clone()), None),
        DatasetOrigin::Synthetic { reason } => {
            (ApiDatasetOrigin::Synthetic, None, Some(reason.clone()))
        }
    };

    HttpResponse::Ok().json(ApiDataset {
        origin,
        source,
        fallback_reason,
        record_count: dataset.len(),
        placeable_count: dataset
            .records()
            .iter()
            .filter(|r| r.coordinates().is_some())
            .count(),
        bounds: state.bounds,
        headline: state.headline,
    })
}

/// `GET /api/buildings`
///
/// Returns the clustered `GeoJSON` source for the requested view.
pub async fn buildings(
    state: web::Data<AppState>,
    params: web::Query<BuildingQueryParams>,
) -> HttpResponse {
    match select(state.dataset.records(), &params) {
        Ok(selection) => HttpResponse::Ok().json(ClusteredSource::new(
            &selection.records,
            ClusterConfig::from(&state.map),
        )),
        Err(message) => bad_request(message),
    }
}

/// `GET /api/insights`
///
/// Returns the insights overlay content for the requested view.
pub async fn insights(
    state: web::Data<AppState>,
    params: web::Query<BuildingQueryParams>,
) -> HttpResponse {
    match select(state.dataset.records(), &params) {
        Ok(selection) => HttpResponse::Ok().json(retrofit_map_analytics::insights(
            &selection.records,
            state.dataset.len(),
            &selection.criteria,
            selection.view.insights_label(),
            TOP_PROPERTY_TYPES,
        )),
        Err(message) => bad_request(message),
    }
}

/// `GET /api/summary`
///
/// Summary statistics over the full dataset.
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(retrofit_map_analytics::summarize(state.dataset.records()))
}

/// `GET /api/priorities`
///
/// The five tiers with their legend colors.
pub async fn priorities() -> HttpResponse {
    let tiers: Vec<ApiPriority> = RetrofitPriority::all()
        .iter()
        .copied()
        .map(ApiPriority::from)
        .collect();

    HttpResponse::Ok().json(tiers)
}

/// A resolved view request.
struct Selection {
    view: ActiveView,
    criteria: FilterCriteria,
    records: Vec<BuildingRecord>,
}

fn select(records: &[BuildingRecord], params: &BuildingQueryParams) -> Result<Selection, String> {
    let view = match non_empty(params.view.as_ref()) {
        Some(view) => view
            .parse::<ActiveView>()
            .map_err(|_| format!("Unknown view '{view}'"))?,
        None if params.has_criteria() => ActiveView::CustomFilter,
        None => ActiveView::All,
    };

    let (criteria, selected) = match view {
        ActiveView::All => (FilterCriteria::default(), records.to_vec()),
        ActiveView::RetrofitCandidates => (
            FilterCriteria::default(),
            retrofit_map_analytics::retrofit_candidates(records),
        ),
        ActiveView::CustomFilter => {
            let criteria = parse_criteria(params)?;
            let filtered = retrofit_map_analytics::apply(records, &criteria);
            (criteria, filtered)
        }
    };

    Ok(Selection {
        view,
        criteria,
        records: selected,
    })
}

fn parse_criteria(params: &BuildingQueryParams) -> Result<FilterCriteria, String> {
    let priority = match non_empty(params.priority.as_ref()) {
        Some(text) => match RetrofitPriority::from_label(text) {
            RetrofitPriority::Unknown => return Err(format!("Unknown retrofit priority '{text}'")),
            priority => Some(priority),
        },
        None => None,
    };

    Ok(FilterCriteria {
        priority,
        property_type: non_empty(params.property_type.as_ref()).map(str::to_string),
        energy_min: parse_score("energyMin", params.energy_min.as_ref(), FULL_RANGE_MIN)?,
        energy_max: parse_score("energyMax", params.energy_max.as_ref(), FULL_RANGE_MAX)?,
    })
}

fn parse_score(name: &str, value: Option<&String>, default: i64) -> Result<i64, String> {
    non_empty(value).map_or(Ok(default), |text| {
        text.parse()
            .map_err(|_| format!("{name} must be an integer, got '{text}'"))
    })
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn bad_request(message: String) -> HttpResponse {
    log::debug!("Rejecting request: {message}");
    HttpResponse::BadRequest().json(ApiError::new(message))
}
