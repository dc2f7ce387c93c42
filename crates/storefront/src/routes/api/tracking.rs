//! Tracking endpoints: outbound click logging and comparison logging.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use beaulytics_core::ProductId;

use crate::db::TrackingRepository;
use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::models::ClickPlatform;
use crate::state::AppState;

/// Generic acknowledgement body.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

/// Outbound click request body.
#[derive(Debug, Deserialize)]
pub struct OutboundClickRequest {
    pub product_id: ProductId,
    pub platform: ClickPlatform,
}

/// Comparison log request body.
#[derive(Debug, Deserialize)]
pub struct CompareLogRequest {
    pub product_ids: Vec<ProductId>,
}

/// `POST /api/outbound-click`: record a marketplace click.
#[instrument(skip(state))]
pub async fn outbound_click(
    State(state): State<AppState>,
    Json(request): Json<OutboundClickRequest>,
) -> Result<Json<Ack>> {
    TrackingRepository::new(state.pool())
        .record_click(request.product_id, request.platform)
        .await?;

    Ok(Json(Ack { ok: true }))
}

/// `POST /api/compare-log`: record a comparison for signed-in users.
///
/// Guests get the same acknowledgement without a write, matching the
/// fire-and-forget client.
#[instrument(skip(state, user))]
pub async fn compare_log(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Json(request): Json<CompareLogRequest>,
) -> Result<Json<Ack>> {
    if let Some(user) = user
        && !request.product_ids.is_empty()
    {
        TrackingRepository::new(state.pool())
            .log_comparison(user.id, &request.product_ids)
            .await?;
    }

    Ok(Json(Ack { ok: true }))
}
