use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::import::provision::PgProvisioner;
use crate::import::sheet::{self, Row};
use crate::import::{self, ImportReport};
use crate::multipart;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ImportParams {
    pub format: Option<String>,
}

#[derive(Deserialize)]
pub struct ImportBody {
    pub rows: Vec<Row>,
}

async fn read_rows(headers: &HeaderMap, body: Bytes) -> Result<Vec<Row>, AppError> {
    if multipart::is_multipart(headers) {
        let mut form = multipart::parse(headers, body)
            .await
            .map_err(AppError::BadRequest)?;
        let file = form
            .take_file("file")
            .ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;
        let text = String::from_utf8(file.data.to_vec())
            .map_err(|_| AppError::BadRequest("The file must be UTF-8 CSV".to_string()))?;
        return sheet::parse_csv(&text).map_err(AppError::BadRequest);
    }

    let body: ImportBody = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))?;
    Ok(body.rows)
}

/// Create or refresh one account per row; `?format=csv` returns the result log as CSV.
pub async fn import(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ImportParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let rows = read_rows(&headers, body).await?;
    if rows.is_empty() {
        return Err(AppError::BadRequest("The sheet has no rows".to_string()));
    }

    tracing::info!("Import of {} rows started by {}", rows.len(), auth.user_id);

    let provisioner = PgProvisioner::new(state.pool.clone(), state.config.email_domain.clone());
    let report: ImportReport = import::run_import(
        &provisioner,
        &rows,
        state.config.utc_offset,
        state.config.import_row_delay,
    )
    .await;

    match params.format.as_deref() {
        Some("csv") => Ok((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"resultado_importacion.csv\"",
                ),
            ],
            report.to_csv(),
        )
            .into_response()),
        _ => Ok(Json(report).into_response()),
    }
}
