use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::backends::{gallery_from_keys, summarize, summary_window, Gallery, MetricsSummary};
use crate::counter::{Action, CounterState};
use crate::http::error::{decode_visitor_request, ApiError};
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// `POST /visitor`: count one event and return the whole aggregate.
pub async fn increment_visitor(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CounterState>, ApiError> {
    let action = match decode_visitor_request(&body) {
        Ok(request) => request.action,
        Err(e) => {
            tracing::debug!(error = %e, "Counting unparseable body as a view");
            Action::View
        }
    };

    let counters = state.counter.increment(action).await?;
    Ok(Json(counters))
}

/// `GET /visitor`: current aggregate, no side effects.
pub async fn get_visitor(State(state): State<AppState>) -> Result<Json<CounterState>, ApiError> {
    Ok(Json(state.counter.snapshot().await?))
}

pub async fn get_gallery(State(state): State<AppState>) -> Result<Json<Gallery>, ApiError> {
    let keys = state.backends.listing.list_keys().await?;
    Ok(Json(gallery_from_keys(&keys, &state.gallery_base_url)))
}

pub async fn get_metrics_summary(State(state): State<AppState>) -> Result<Json<MetricsSummary>, ApiError> {
    let (start, end) = summary_window(Utc::now());
    let series = state.backends.metrics.query(start, end).await?;
    Ok(Json(summarize(series)))
}
