use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Cesantia, Estado};

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    motivo: &str,
    categoria: &str,
    file_url: Option<&str>,
) -> Result<Cesantia, sqlx::Error> {
    sqlx::query_as::<_, Cesantia>(
        "INSERT INTO cesantias (user_id, motivo, categoria, file_url)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(user_id)
    .bind(motivo)
    .bind(categoria)
    .bind(file_url)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Cesantia>, sqlx::Error> {
    sqlx::query_as::<_, Cesantia>("SELECT * FROM cesantias WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Cesantia>, sqlx::Error> {
    sqlx::query_as::<_, Cesantia>("SELECT * FROM cesantias ORDER BY created_at ASC")
        .fetch_all(pool)
        .await
}

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Cesantia>, sqlx::Error> {
    sqlx::query_as::<_, Cesantia>(
        "SELECT * FROM cesantias WHERE user_id = $1 ORDER BY created_at DESC",
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
) -> Result<Option<Cesantia>, sqlx::Error> {
    sqlx::query_as::<_, Cesantia>(
        "UPDATE cesantias SET estado = $2, updated_at = now()
         WHERE id = $1 AND estado = 'pendiente' RETURNING *",
    )
    .bind(id)
    .bind(estado)
    .fetch_optional(pool)
    .await
}

/// Whether `user_id` attached `file_url` to one of their cesantias.
pub async fn owns_file(pool: &PgPool, user_id: Uuid, file_url: &str) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM cesantias WHERE user_id = $1 AND file_url = $2)",
    )
    .bind(user_id)
    .bind(file_url)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}
