use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::assistant::{self, ChatMessage};
use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::state::SharedState;

const MAX_MESSAGES: usize = 50;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

pub async fn chat(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    let Some(ref client) = state.assistant else {
        return Err(AppError::Unavailable(
            "The assistant is not configured".to_string(),
        ));
    };

    if req.messages.iter().all(|m| m.content.trim().is_empty()) {
        return Err(AppError::BadRequest("messages is required".to_string()));
    }

    // Keep the most recent turns only
    let start = req.messages.len().saturating_sub(MAX_MESSAGES);
    let prompt = assistant::build_prompt(&req.messages[start..]);

    let message = client
        .complete(&prompt)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({ "message": message })))
}
