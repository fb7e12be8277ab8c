use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Pqrsf, PqrsfTipo};

pub async fn create(
    pool: &PgPool,
    user_id: Option<Uuid>,
    tipo: PqrsfTipo,
    mensaje: &str,
    anonimo: bool,
) -> Result<Pqrsf, sqlx::Error> {
    sqlx::query_as::<_, Pqrsf>(
        "INSERT INTO pqrsf (user_id, tipo, mensaje, anonimo)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(user_id)
    .bind(tipo)
    .bind(mensaje)
    .bind(anonimo)
    .fetch_one(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Pqrsf>, sqlx::Error> {
    sqlx::query_as::<_, Pqrsf>("SELECT * FROM pqrsf ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pqrsf")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
