use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::errors::AppError;
use crate::models::{ChatRequest, ChatResponse, SessionSlots};
use crate::services::agent;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

// POST /api/agent/chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let identity = state.identity.resolve(bearer_token(&headers)).await?;
    Ok(Json(agent::handle_turn(&state, &identity, &request).await))
}

// GET /api/agent/session/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionSlots>, AppError> {
    state
        .sessions
        .load(&id)
        .await
        .map(|ctx| Json(SessionSlots::from(ctx)))
        .ok_or_else(|| AppError::NotFound(format!("session {id}")))
}
