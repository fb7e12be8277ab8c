use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::calendar;
use crate::dates;
use crate::db;
use crate::db::solicitudes::NewSolicitud;
use crate::error::AppError;
use crate::models::{Cesantia, Estado, EventType, Solicitud, SolicitudTipo, User};
use crate::multipart::{self, Form};
use crate::requests::{self, RequestKind, RequestStats, RequestSummary};
use crate::state::SharedState;
use crate::storage;

#[derive(Deserialize)]
pub struct CreateSolicitud {
    pub tipo: SolicitudTipo,
    #[serde(default)]
    pub detalles: Value,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct Decision {
    pub estado: Estado,
}

async fn parse_form(headers: &HeaderMap, body: Bytes) -> Result<Form, AppError> {
    if !multipart::is_multipart(headers) {
        return Err(AppError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }
    multipart::parse(headers, body)
        .await
        .map_err(AppError::BadRequest)
}

fn parse_date_field(form: &Form, name: &str) -> Result<Option<NaiveDate>, AppError> {
    form.text(name)
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("Invalid {name}")))
        })
        .transpose()
}

/// E-mail every admin with a contact address about a new request. Runs in the background.
fn notify_admins(state: &SharedState, user_id: Uuid) {
    let Some(mailer) = state.mailer.clone() else {
        return;
    };
    let pool = state.pool.clone();
    let base_url = state.config.base_url.clone();

    tokio::spawn(async move {
        let user_name = match db::users::find_by_id(&pool, user_id).await {
            Ok(Some(user)) => user.name,
            _ => return,
        };
        let admins = match db::users::list_admins(&pool).await {
            Ok(admins) => admins,
            Err(e) => {
                tracing::error!("Failed to load admins for notification: {e}");
                return;
            }
        };
        for admin in admins {
            if let Some(address) = admin.notification_address() {
                if let Err(e) = mailer
                    .send_request_notification(address, &user_name, &base_url)
                    .await
                {
                    tracing::error!("Failed to notify admin {}: {e}", admin.id);
                }
            }
        }
    });
}

/// E-mail the employee that their request was decided. Runs in the background.
fn notify_decision(state: &SharedState, user_id: Uuid, kind: RequestKind, estado: Estado) {
    let Some(mailer) = state.mailer.clone() else {
        return;
    };
    let pool = state.pool.clone();
    let base_url = state.config.base_url.clone();

    tokio::spawn(async move {
        let Ok(Some(user)) = db::users::find_by_id(&pool, user_id).await else {
            return;
        };
        let Some(address) = user.notification_address() else {
            tracing::debug!("User {} has no contact e-mail, skipping notification", user.id);
            return;
        };
        if let Err(e) = mailer
            .send_request_decided(address, &user.name, kind.label(), estado, &base_url)
            .await
        {
            tracing::error!("Failed to notify user {}: {e}", user.id);
        }
    });
}

pub async fn create_cesantia(
    auth: AuthUser,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Cesantia>, AppError> {
    let mut form = parse_form(&headers, body).await?;

    let motivo = form
        .text("motivo")
        .ok_or_else(|| AppError::BadRequest("motivo is required".to_string()))?
        .to_string();
    let categoria = form
        .text("categoria")
        .ok_or_else(|| AppError::BadRequest("categoria is required".to_string()))?
        .to_string();

    let file_url = match form.take_file("file") {
        Some(file) => Some(
            state
                .storage
                .save(storage::CESANTIAS, &file)
                .await
                .map_err(AppError::Internal)?
                .url,
        ),
        None => None,
    };

    let cesantia = db::cesantias::create(
        &state.pool,
        auth.user_id,
        &motivo,
        &categoria,
        file_url.as_deref(),
    )
    .await?;

    tracing::info!("Cesantias request {} filed by {}", cesantia.id, auth.user_id);
    notify_admins(&state, auth.user_id);

    Ok(Json(cesantia))
}

pub async fn my_cesantias(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Cesantia>>, AppError> {
    let cesantias = db::cesantias::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(cesantias))
}

/// Accepts JSON, or multipart with `detalles` as a JSON string and an optional `file`.
pub async fn create_solicitud(
    auth: AuthUser,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Solicitud>, AppError> {
    let (req, file) = if multipart::is_multipart(&headers) {
        let mut form = parse_form(&headers, body).await?;
        let tipo = form
            .text("tipo")
            .ok_or_else(|| AppError::BadRequest("tipo is required".to_string()))?
            .parse::<SolicitudTipo>()
            .map_err(AppError::BadRequest)?;
        let detalles = match form.text("detalles") {
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| AppError::BadRequest(format!("Invalid detalles: {e}")))?,
            None => json!({}),
        };
        let req = CreateSolicitud {
            tipo,
            detalles,
            fecha_inicio: parse_date_field(&form, "fecha_inicio")?,
            fecha_fin: parse_date_field(&form, "fecha_fin")?,
        };
        (req, form.take_file("file"))
    } else {
        let req: CreateSolicitud = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))?;
        (req, None)
    };

    let detalles = match req.detalles {
        Value::Null => json!({}),
        obj @ Value::Object(_) => obj,
        _ => {
            return Err(AppError::BadRequest(
                "detalles must be an object".to_string(),
            ));
        }
    };

    match (req.fecha_inicio, req.fecha_fin) {
        (Some(start), Some(end)) if start > end => {
            return Err(AppError::BadRequest(
                "fecha_inicio must not be after fecha_fin".to_string(),
            ));
        }
        (Some(_), Some(_)) => {}
        _ if req.tipo.requires_dates() => {
            return Err(AppError::BadRequest(format!(
                "fecha_inicio and fecha_fin are required for {}",
                req.tipo
            )));
        }
        _ => {}
    }

    let file_url = match file {
        Some(file) => Some(
            state
                .storage
                .save(storage::SOLICITUDES, &file)
                .await
                .map_err(AppError::Internal)?
                .url,
        ),
        None => None,
    };

    let solicitud = db::solicitudes::create(
        &state.pool,
        &NewSolicitud {
            user_id: auth.user_id,
            tipo: req.tipo,
            detalles: &detalles,
            fecha_inicio: req.fecha_inicio,
            fecha_fin: req.fecha_fin,
            file_url: file_url.as_deref(),
        },
    )
    .await?;

    tracing::info!(
        "Solicitud {} ({}) filed by {}",
        solicitud.id,
        solicitud.tipo,
        auth.user_id
    );
    notify_admins(&state, auth.user_id);

    Ok(Json(solicitud))
}

pub async fn my_solicitudes(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Solicitud>>, AppError> {
    let solicitudes = db::solicitudes::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(solicitudes))
}

async fn load_review_queue(state: &SharedState) -> Result<(Vec<RequestSummary>, Vec<User>), AppError> {
    let (cesantias, solicitudes, users) = tokio::try_join!(
        db::cesantias::list_all(&state.pool),
        db::solicitudes::list_all(&state.pool),
        db::users::list_all(&state.pool),
    )?;

    let mut merged = requests::merge_requests(&cesantias, &solicitudes);
    requests::attach_user_names(&mut merged, &users);
    Ok((merged, users))
}

/// Every request, pending first and then oldest first.
pub async fn list_all(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<RequestSummary>>, AppError> {
    auth.require_admin()?;
    let (merged, _) = load_review_queue(&state).await?;
    Ok(Json(merged))
}

pub async fn stats(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Value>, AppError> {
    auth.require_admin()?;

    let (merged, users) = load_review_queue(&state).await?;
    let pqrsf = db::pqrsf::count_all(&state.pool).await?;
    let events = db::calendar_events::list_all(&state.pool).await?;
    let today = dates::today(state.config.utc_offset);
    let birthdays_today = calendar::events_on(&events, today)
        .iter()
        .filter(|e| e.event_type == EventType::Birthday)
        .count();

    Ok(Json(json!({
        "users": users.len(),
        "pqrsf": pqrsf,
        "birthdays_today": birthdays_today,
        "requests": RequestStats::from_summaries(&merged),
    })))
}

fn check_decision(current: Estado, next: Estado) -> Result<(), AppError> {
    if next == Estado::Pendiente {
        return Err(AppError::BadRequest(
            "estado must be aprobado or rechazado".to_string(),
        ));
    }
    if !current.can_transition_to(next) {
        return Err(AppError::Conflict(format!("Request is already {current}")));
    }
    Ok(())
}

pub async fn decide_cesantia(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<Decision>,
) -> Result<Json<Cesantia>, AppError> {
    auth.require_admin()?;

    let current = db::cesantias::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;
    check_decision(current.estado, req.estado)?;

    let cesantia = db::cesantias::decide(&state.pool, id, req.estado)
        .await?
        .ok_or_else(|| AppError::Conflict("Request was decided concurrently".to_string()))?;

    tracing::info!("Cesantias {} {} by {}", id, cesantia.estado, auth.user_id);
    notify_decision(&state, cesantia.user_id, RequestKind::Cesantias, cesantia.estado);

    Ok(Json(cesantia))
}

pub async fn decide_solicitud(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<Decision>,
) -> Result<Json<Solicitud>, AppError> {
    auth.require_admin()?;

    let current = db::solicitudes::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;
    check_decision(current.estado, req.estado)?;

    let solicitud = db::solicitudes::decide(&state.pool, id, req.estado)
        .await?
        .ok_or_else(|| AppError::Conflict("Request was decided concurrently".to_string()))?;

    tracing::info!("Solicitud {} {} by {}", id, solicitud.estado, auth.user_id);
    notify_decision(
        &state,
        solicitud.user_id,
        solicitud.tipo.into(),
        solicitud.estado,
    );

    Ok(Json(solicitud))
}
