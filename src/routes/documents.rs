use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::Document;
use crate::multipart;
use crate::state::SharedState;
use crate::storage;

#[derive(Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Document>>, AppError> {
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let documents = db::documents::list(&state.pool, category).await?;
    Ok(Json(documents))
}

pub async fn upload(
    auth: AuthUser,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Document>, AppError> {
    auth.require_admin()?;

    if !multipart::is_multipart(&headers) {
        return Err(AppError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }
    let mut form = multipart::parse(&headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let file = form
        .take_file("file")
        .ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;
    let name = form
        .text("name")
        .unwrap_or(file.filename.as_str())
        .to_string();
    let category = form.text("category").unwrap_or("general").to_string();

    let target = state.storage.locate(storage::DOCUMENTS, &file);

    let mut tx = state.pool.begin().await?;
    db::documents::lock_file(&mut *tx, &target.url).await?;

    let stored = state
        .storage
        .save(storage::DOCUMENTS, &file)
        .await
        .map_err(AppError::Internal)?;

    let document = db::documents::create(
        &mut *tx,
        &name,
        &category,
        &stored.url,
        &stored.sha256,
        auth.user_id,
    )
    .await?;

    tx.commit().await?;

    tracing::info!("Document {} uploaded to {}", document.id, document.file_url);

    Ok(Json(document))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    auth.require_admin()?;

    let mut tx = state.pool.begin().await?;

    let document = db::documents::delete(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    // Identical uploads share one stored file
    db::documents::lock_file(&mut *tx, &document.file_url).await?;
    if db::documents::count_by_file_url(&mut *tx, &document.file_url).await? == 0 {
        if let Err(e) = state.storage.remove(&document.file_url).await {
            tracing::warn!("Document {} deleted but its file remains: {e}", document.id);
        }
    }

    tx.commit().await?;

    Ok(Json(json!({ "message": "Deleted" })))
}
