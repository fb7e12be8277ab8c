use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Estado, Solicitud, SolicitudTipo};

pub struct NewSolicitud<'a> {
    pub user_id: Uuid,
    pub tipo: SolicitudTipo,
    pub detalles: &'a serde_json::Value,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub file_url: Option<&'a str>,
}

pub async fn create(pool: &PgPool, new: &NewSolicitud<'_>) -> Result<Solicitud, sqlx::Error> {
    sqlx::query_as::<_, Solicitud>(
        "INSERT INTO solicitudes (user_id, tipo, detalles, fecha_inicio, fecha_fin, file_url)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(new.user_id)
    .bind(new.tipo)
    .bind(new.detalles)
    .bind(new.fecha_inicio)
    .bind(new.fecha_fin)
    .bind(new.file_url)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Solicitud>, sqlx::Error> {
    sqlx::query_as::<_, Solicitud>("SELECT * FROM solicitudes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Solicitud>, sqlx::Error> {
    sqlx::query_as::<_, Solicitud>("SELECT * FROM solicitudes ORDER BY created_at ASC")
        .fetch_all(pool)
        .await
}

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Solicitud>, sqlx::Error> {
    sqlx::query_as::<_, Solicitud>(
        "SELECT * FROM solicitudes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Decide a pending request. `None` when the row is missing or already decided.
pub async fn decide(
    pool: &PgPool,
    id: Uuid,
    estado: Estado,
) -> Result<Option<Solicitud>, sqlx::Error> {
    sqlx::query_as::<_, Solicitud>(
        "UPDATE solicitudes SET estado = $2, updated_at = now()
         WHERE id = $1 AND estado = 'pendiente' RETURNING *",
    )
    .bind(id)
    .bind(estado)
    .fetch_optional(pool)
    .await
}

pub async fn owns_file(pool: &PgPool, user_id: Uuid, file_url: &str) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM solicitudes WHERE user_id = $1 AND file_url = $2)",
    )
    .bind(user_id)
    .bind(file_url)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}
