use axum::Json;
use axum::extract::{Query, State};

use crate::domain::ChartRange;
use crate::presentation::state::AppState;

use super::dto::{ChartsQuery, ChartsResponse, MetricsResponse};

pub async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(state.dashboard_service.metrics().into())
}

pub async fn charts_handler(
    State(state): State<AppState>,
    Query(query): Query<ChartsQuery>,
) -> Json<ChartsResponse> {
    let range = ChartRange::from_query(query.range.as_deref());
    Json(state.dashboard_service.charts(range).into())
}
