use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Document;

/// Serializes uploads and deletes touching one stored file until the
/// transaction ends.
pub async fn lock_file<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    file_url: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(file_url)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    name: &str,
    category: &str,
    file_url: &str,
    sha256: &str,
    uploaded_by: Uuid,
) -> Result<Document, sqlx::Error> {
    sqlx::query_as::<_, Document>(
        "INSERT INTO documents (name, category, file_url, sha256, uploaded_by)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(name)
    .bind(category)
    .bind(file_url)
    .bind(sha256)
    .bind(uploaded_by)
    .fetch_one(executor)
    .await
}

pub async fn list(pool: &PgPool, category: Option<&str>) -> Result<Vec<Document>, sqlx::Error> {
    match category {
        Some(category) => {
            sqlx::query_as::<_, Document>(
                "SELECT * FROM documents WHERE category = $1 ORDER BY created_at DESC",
            )
            .bind(category)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Document>("SELECT * FROM documents ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
        }
    }
}

/// Delete and return the record, so the caller can remove the stored file.
pub async fn delete<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Document>, sqlx::Error> {
    sqlx::query_as::<_, Document>("DELETE FROM documents WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Other records still pointing at the same stored file.
pub async fn count_by_file_url<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    file_url: &str,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents WHERE file_url = $1")
        .bind(file_url)
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}
