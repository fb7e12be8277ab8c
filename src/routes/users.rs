use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::users::ProfileUpdate;
use crate::error::AppError;
use crate::import::provision::{PgProvisioner, Provisioner};
use crate::import::sheet::{EmployeeRecord, Row};
use crate::models::{Role, User};
use crate::state::SharedState;

/// Accounts removed per statement by `delete_all_users`.
const DELETE_PAGE_SIZE: i64 = 1000;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFromExcel {
    pub cedula: Option<Value>,
    pub nombre: Option<String>,
    pub posicion: Option<String>,
    pub fecha_nacimiento: Option<Value>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl CreateFromExcel {
    /// The request as a sheet row, so it goes through the same column rules as a file import.
    fn into_row(self) -> Row {
        let mut row = self.extra;
        let known = [
            ("cedula", self.cedula),
            ("nombre", self.nombre.map(Value::String)),
            ("posicion", self.posicion.map(Value::String)),
            ("fecha nacimiento", self.fecha_nacimiento),
        ];
        for (column, value) in known {
            if let Some(value) = value {
                row.insert(column.to_string(), value);
            }
        }
        row
    }
}

#[derive(Deserialize)]
pub struct DeleteUser {
    pub uid: Uuid,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: String,
    pub role: Role,
    pub position: Option<String>,
    pub contact_email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub async fn create_from_excel(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateFromExcel>,
) -> Result<Json<Value>, Response> {
    auth.require_admin().map_err(IntoResponse::into_response)?;

    let record = EmployeeRecord::from_row(&req.into_row(), state.config.utc_offset)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e))?;

    let provisioner = PgProvisioner::new(state.pool.clone(), state.config.email_domain.clone());
    let provisioned = provisioner.provision(&record).await.map_err(|e| {
        tracing::error!("Provisioning cedula {} failed: {e}", record.cedula);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.message)
    })?;

    Ok(Json(json!({
        "success": true,
        "uid": provisioned.uid,
        "email": provisioned.email,
    })))
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    auth.require_admin()?;
    let users = db::users::list_all(&state.pool).await?;
    Ok(Json(users))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    auth.require_admin()?;
    let user = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUser>,
) -> Result<Json<User>, AppError> {
    auth.require_admin()?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if id == auth.user_id && req.role != Role::Admin {
        return Err(AppError::BadRequest(
            "You cannot remove your own admin role".to_string(),
        ));
    }

    let profile = ProfileUpdate {
        name: name.to_string(),
        position: req.position,
        contact_email: req.contact_email,
        birth_date: req.birth_date,
        hire_date: req.hire_date,
        extra: Value::Object(req.extra),
    };

    let user = db::users::update(&state.pool, id, req.role, &profile)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!("User {} updated by {}", user.id, auth.user_id);

    Ok(Json(user))
}

pub async fn delete_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<DeleteUser>,
) -> Result<Json<Value>, AppError> {
    auth.require_admin()?;

    if req.uid == auth.user_id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    if db::users::delete(&state.pool, req.uid).await? == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!("User {} deleted by {}", req.uid, auth.user_id);

    Ok(Json(json!({ "success": true })))
}

pub async fn delete_all_users(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Value>, AppError> {
    auth.require_admin()?;

    let mut deleted_count: u64 = 0;
    loop {
        let deleted =
            db::users::delete_page_except(&state.pool, auth.user_id, DELETE_PAGE_SIZE).await?;
        deleted_count += deleted;
        if deleted < DELETE_PAGE_SIZE as u64 {
            break;
        }
    }

    tracing::warn!("{deleted_count} accounts deleted by {}", auth.user_id);

    Ok(Json(json!({ "success": true, "deletedCount": deleted_count })))
}
