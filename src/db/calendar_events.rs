use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CalendarEvent, EventType};

pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub event_type: EventType,
    pub media_url: Option<String>,
    pub user_id: Option<Uuid>,
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    event: &NewEvent,
) -> Result<CalendarEvent, sqlx::Error> {
    sqlx::query_as::<_, CalendarEvent>(
        "INSERT INTO calendar_events (title, description, event_date, event_type, media_url, user_id)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.event_date)
    .bind(event.event_type)
    .bind(&event.media_url)
    .bind(event.user_id)
    .fetch_one(executor)
    .await
}

pub async fn has_birthday<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM calendar_events WHERE user_id = $1 AND event_type = 'birthday')",
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;
    Ok(row.0)
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<CalendarEvent>, sqlx::Error> {
    sqlx::query_as::<_, CalendarEvent>(
        "SELECT * FROM calendar_events ORDER BY event_date ASC, title ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
