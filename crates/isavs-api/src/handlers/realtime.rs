//! Realtime stats and event publishing handlers.

use axum::Json;
use axum::extract::State;
use tracing::info;

use isavs_realtime::BroadcastReport;
use isavs_realtime::server::RealtimeStats;

use crate::dto::request::PublishEventRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::PublisherAuth;
use crate::state::AppState;

/// GET /api/realtime/stats
pub async fn stats(
    State(state): State<AppState>,
    _auth: PublisherAuth,
) -> Json<ApiResponse<RealtimeStats>> {
    Json(ApiResponse::ok(state.realtime.stats()))
}

/// POST /api/realtime/events
pub async fn publish_event(
    State(state): State<AppState>,
    _auth: PublisherAuth,
    Json(req): Json<PublishEventRequest>,
) -> Result<Json<ApiResponse<BroadcastReport>>, ApiError> {
    let event = req.into_event()?;
    let report = state.realtime.publisher.publish(&event);

    info!(
        event_type = %event.event_type,
        delivered = report.delivered,
        failed = report.failed,
        "Published dashboard event"
    );

    Ok(Json(ApiResponse::ok(report)))
}
