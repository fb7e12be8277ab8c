use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::calendar::{self, Occurrence};
use crate::dates;
use crate::db;
use crate::db::calendar_events::NewEvent;
use crate::error::AppError;
use crate::models::{CalendarEvent, EventType};
use crate::state::SharedState;

const DEFAULT_UPCOMING_DAYS: u32 = 30;
const MAX_UPCOMING_DAYS: u32 = 366;

#[derive(Deserialize)]
pub struct ListParams {
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct UpcomingParams {
    pub days: Option<u32>,
}

#[derive(Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    /// Calendar date, or anything the sheet date parser accepts.
    pub date: Value,
    #[serde(default = "default_event_type")]
    pub event_type: EventType,
    pub media_url: Option<String>,
    pub user_id: Option<Uuid>,
}

fn default_event_type() -> EventType {
    EventType::General
}

/// All events, or only the ones occurring on `?date=`.
pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    let events = db::calendar_events::list_all(&state.pool).await?;
    let events = match params.date {
        Some(date) => calendar::events_on(&events, date)
            .into_iter()
            .cloned()
            .collect(),
        None => events,
    };
    Ok(Json(events))
}

pub async fn today(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Value>, AppError> {
    let today = dates::today(state.config.utc_offset);
    let events = db::calendar_events::list_all(&state.pool).await?;
    let (birthdays, others): (Vec<&CalendarEvent>, Vec<&CalendarEvent>) =
        calendar::events_on(&events, today)
            .into_iter()
            .partition(|e| e.event_type == EventType::Birthday);

    Ok(Json(json!({
        "date": today,
        "birthdays": birthdays,
        "events": others,
    })))
}

pub async fn upcoming(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<UpcomingParams>,
) -> Result<Json<Vec<Occurrence>>, AppError> {
    let days = params
        .days
        .unwrap_or(DEFAULT_UPCOMING_DAYS)
        .clamp(1, MAX_UPCOMING_DAYS);
    let from = dates::today(state.config.utc_offset);
    let events = db::calendar_events::list_all(&state.pool).await?;
    Ok(Json(calendar::upcoming(&events, from, days)))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateEvent>,
) -> Result<Json<CalendarEvent>, AppError> {
    auth.require_admin()?;

    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    let event_date = dates::parse_sheet_date(&req.date, state.config.utc_offset)
        .ok_or_else(|| AppError::BadRequest("Invalid date".to_string()))?;

    if let Some(user_id) = req.user_id {
        db::users::find_by_id(&state.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    }

    let event = db::calendar_events::create(
        &state.pool,
        &NewEvent {
            title: title.to_string(),
            description: req.description,
            event_date,
            event_type: req.event_type,
            media_url: req.media_url,
            user_id: req.user_id,
        },
    )
    .await?;

    tracing::info!("Calendar event {} created for {}", event.id, event.event_date);

    Ok(Json(event))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    auth.require_admin()?;

    if db::calendar_events::delete(&state.pool, id).await? == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    Ok(Json(json!({ "message": "Deleted" })))
}
