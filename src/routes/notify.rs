use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::state::SharedState;

const MAX_RECIPIENTS: usize = 100;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmail {
    pub emails: Vec<String>,
    pub user_name: String,
}

/// Notify the given addresses that `userName` filed a request.
pub async fn send_email(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<SendEmail>,
) -> Result<Json<Value>, AppError> {
    let Some(ref mailer) = state.mailer else {
        return Err(AppError::Unavailable("E-mail is not configured".to_string()));
    };

    let emails: Vec<&str> = req
        .emails
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .collect();
    if emails.is_empty() {
        return Err(AppError::BadRequest("emails is required".to_string()));
    }
    if emails.len() > MAX_RECIPIENTS {
        return Err(AppError::BadRequest(format!(
            "At most {MAX_RECIPIENTS} recipients per call"
        )));
    }

    let mut sent = 0usize;
    let mut failed = Vec::new();
    for email in &emails {
        match mailer
            .send_request_notification(email, &req.user_name, &state.config.base_url)
            .await
        {
            Ok(()) => sent += 1,
            Err(e) => {
                tracing::error!("Notification to {email} failed: {e}");
                failed.push(*email);
            }
        }
    }

    Ok(Json(json!({
        "success": failed.is_empty(),
        "sent": sent,
        "failed": failed,
    })))
}
