use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Role, User};

/// HR fields written by imports and admin edits.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub position: Option<String>,
    pub contact_email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub extra: serde_json::Value,
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    cedula: &str,
    email: &str,
    password_hash: &str,
    role: Role,
    self_registered: bool,
    profile: &ProfileUpdate,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (cedula, email, password_hash, role, self_registered, name, position,
                            contact_email, birth_date, hire_date, extra)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
    )
    .bind(cedula)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(self_registered)
    .bind(&profile.name)
    .bind(&profile.position)
    .bind(&profile.contact_email)
    .bind(profile.birth_date)
    .bind(profile.hire_date)
    .bind(&profile.extra)
    .fetch_one(executor)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_cedula(pool: &PgPool, cedula: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE cedula = $1")
        .bind(cedula)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn count_all<'e, E: sqlx::PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

pub async fn list_admins(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = 'admin' ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

/// Import upsert: blank sheet cells keep the stored value, extra columns merge.
pub async fn update_profile<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    profile: &ProfileUpdate,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET
            name = $2,
            position = COALESCE($3, position),
            contact_email = COALESCE($4, contact_email),
            birth_date = COALESCE($5, birth_date),
            hire_date = COALESCE($6, hire_date),
            extra = extra || $7
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&profile.name)
    .bind(&profile.position)
    .bind(&profile.contact_email)
    .bind(profile.birth_date)
    .bind(profile.hire_date)
    .bind(&profile.extra)
    .fetch_one(executor)
    .await
}

/// Admin edit: every field is replaced as given.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    role: Role,
    profile: &ProfileUpdate,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET
            role = $2,
            name = $3,
            position = $4,
            contact_email = $5,
            birth_date = $6,
            hire_date = $7,
            extra = $8
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(role)
    .bind(&profile.name)
    .bind(&profile.position)
    .bind(&profile.contact_email)
    .bind(profile.birth_date)
    .bind(profile.hire_date)
    .bind(&profile.extra)
    .fetch_optional(pool)
    .await
}

/// HR takes over a self-registered account: the password goes back to the
/// initial one and the account counts as provisioned from then on.
pub async fn reclaim<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $2, self_registered = false WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Delete up to `limit` accounts other than `keep`, oldest first.
pub async fn delete_page_except(
    pool: &PgPool,
    keep: Uuid,
    limit: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM users WHERE id IN (
            SELECT id FROM users WHERE id <> $1 ORDER BY created_at LIMIT $2
        )",
    )
    .bind(keep)
    .bind(limit)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
