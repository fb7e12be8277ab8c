use axum::extract::{Path, Request, State};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;
use crate::storage::{self, PUBLIC_PREFIX};

/// Stored uploads. Company documents are readable by every employee;
/// request attachments only by their owner and by admins.
pub async fn serve(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((folder, name)): Path<(String, String)>,
    request: Request,
) -> Result<Response, AppError> {
    let url = format!("{PUBLIC_PREFIX}/{folder}/{name}");
    let not_found = || AppError::NotFound("File not found".to_string());

    let allowed = match folder.as_str() {
        storage::DOCUMENTS => true,
        _ if auth.is_admin() => true,
        storage::CESANTIAS => db::cesantias::owns_file(&state.pool, auth.user_id, &url).await?,
        storage::SOLICITUDES => {
            db::solicitudes::owns_file(&state.pool, auth.user_id, &url).await?
        }
        _ => false,
    };
    if !allowed {
        return Err(not_found());
    }

    let path = state.storage.resolve(&url).ok_or_else(not_found)?;

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}
