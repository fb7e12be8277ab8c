use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Pqrsf, PqrsfTipo};
use crate::state::SharedState;

const MAX_MESSAGE_LEN: usize = 5000;

#[derive(Deserialize)]
pub struct CreatePqrsf {
    pub tipo: PqrsfTipo,
    pub mensaje: String,
    #[serde(default)]
    pub anonimo: bool,
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreatePqrsf>,
) -> Result<Json<Pqrsf>, AppError> {
    let mensaje = req.mensaje.trim();
    if mensaje.is_empty() {
        return Err(AppError::BadRequest("mensaje is required".to_string()));
    }
    if mensaje.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::BadRequest(format!(
            "mensaje must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }

    let author = (!req.anonimo).then_some(auth.user_id);
    let pqrsf = db::pqrsf::create(&state.pool, author, req.tipo, mensaje, req.anonimo).await?;

    tracing::info!("PQRSF {} ({}) received", pqrsf.id, pqrsf.tipo);

    Ok(Json(pqrsf))
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Pqrsf>>, AppError> {
    auth.require_admin()?;
    let items = db::pqrsf::list_all(&state.pool).await?;
    Ok(Json(items))
}
