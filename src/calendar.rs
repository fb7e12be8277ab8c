//! Which calendar events occur on a given day.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::{CalendarEvent, EventType};

/// One concrete day on which an event happens.
#[derive(Debug, Clone, Serialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub event: CalendarEvent,
}

/// The date a yearly event falls on in `year`. February 29 moves to
/// February 28 in common years.
pub fn anniversary_in(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day()).or_else(|| {
        if date.month() == 2 && date.day() == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

pub fn occurs_on(event: &CalendarEvent, date: NaiveDate) -> bool {
    match event.event_type {
        EventType::Birthday => anniversary_in(event.event_date, date.year()) == Some(date),
        EventType::General => event.event_date == date,
    }
}

pub fn events_on(events: &[CalendarEvent], date: NaiveDate) -> Vec<&CalendarEvent> {
    events.iter().filter(|e| occurs_on(e, date)).collect()
}

/// First day on or after `from` when the event happens.
pub fn next_occurrence(event: &CalendarEvent, from: NaiveDate) -> Option<NaiveDate> {
    match event.event_type {
        EventType::Birthday => {
            let this_year = anniversary_in(event.event_date, from.year())?;
            if this_year >= from {
                Some(this_year)
            } else {
                anniversary_in(event.event_date, from.year() + 1)
            }
        }
        EventType::General => (event.event_date >= from).then_some(event.event_date),
    }
}

/// Occurrences in `[from, from + days)`, ordered by date then title.
pub fn upcoming(events: &[CalendarEvent], from: NaiveDate, days: u32) -> Vec<Occurrence> {
    let Some(end) = from.checked_add_signed(Duration::days(i64::from(days))) else {
        return Vec::new();
    };

    let mut occurrences: Vec<Occurrence> = events
        .iter()
        .filter_map(|event| {
            next_occurrence(event, from)
                .filter(|date| *date < end)
                .map(|date| Occurrence {
                    date,
                    event: event.clone(),
                })
        })
        .collect();

    occurrences.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.event.title.cmp(&b.event.title)));
    occurrences
}
