//! The AI relay endpoint: `POST /api/skin-ai`.
//!
//! Session-authenticated and rate limited (see the router assembly). The
//! request body carries the whole conversation; the response carries the
//! reply text, its HTML rendering, and any recommended products.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::ai::Message;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::services::skin_ai::{ChatMode, RelayReply, SkinAiService};
use crate::state::AppState;

/// Most conversation turns accepted per request.
const MAX_TURNS: usize = 40;

/// Relay request body.
#[derive(Debug, Deserialize)]
pub struct SkinAiRequest {
    #[serde(default)]
    pub mode: ChatMode,
    pub messages: Vec<Message>,
}

/// Run one relay turn.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn relay(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<SkinAiRequest>,
) -> Result<Json<RelayReply>> {
    let Some(groq) = state.groq() else {
        return Err(AppError::ServiceUnavailable(
            "AI is not configured".to_string(),
        ));
    };

    if request.messages.is_empty() {
        return Err(AppError::BadRequest("messages must not be empty".to_string()));
    }
    if request.messages.len() > MAX_TURNS {
        return Err(AppError::BadRequest(format!(
            "conversation too long (max {MAX_TURNS} turns)"
        )));
    }

    let reply = SkinAiService::new(state.pool(), groq)
        .relay(request.messages, request.mode)
        .await?;

    Ok(Json(reply))
}
