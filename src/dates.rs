//! Calendar-date normalization.
//!
//! Every date the portal stores is a timezone-naive calendar date. Instants
//! and spreadsheet serials are converted exactly once, on the way in, and
//! nothing is shifted on the way out.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde_json::Value;

/// Day zero of spreadsheet serial dates. Serial 1 is 1899-12-31.
///
/// Serials below 61 differ by one day from what Excel displays, because Excel
/// counts a 1900-02-29 that never existed. HR data never reaches that range.
pub const EXCEL_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1899, 12, 30) {
    Some(date) => date,
    None => panic!("invalid spreadsheet epoch"),
};

/// Serial of 9999-12-31, the last date spreadsheets can represent.
const MAX_SERIAL: f64 = 2_958_465.0;

const TEXT_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Convert a spreadsheet serial to a calendar date. The time-of-day fraction
/// is dropped.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    EXCEL_EPOCH.checked_add_signed(Duration::days(serial.trunc() as i64))
}

pub fn date_to_excel_serial(date: NaiveDate) -> i64 {
    (date - EXCEL_EPOCH).num_days()
}

/// The calendar date of `ts` as seen from the business timezone.
pub fn normalize_instant(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

/// Today in the business timezone.
pub fn today(offset: FixedOffset) -> NaiveDate {
    normalize_instant(Utc::now(), offset)
}

/// Read a date out of a spreadsheet cell or JSON field.
///
/// Accepts serial numbers (as numbers or numeric text), `YYYY-MM-DD`,
/// `DD/MM/YYYY`, `DD-MM-YYYY`, `YYYY/MM/DD` and RFC 3339 timestamps.
pub fn parse_sheet_date(value: &Value, offset: FixedOffset) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => n.as_f64().and_then(excel_serial_to_date),
        Value::String(s) => parse_date_text(s, offset),
        _ => None,
    }
}

pub fn parse_date_text(text: &str, offset: FixedOffset) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(serial) = text.parse::<f64>() {
        return excel_serial_to_date(serial);
    }

    if let Some(date) = TEXT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|ts| normalize_instant(ts.with_timezone(&Utc), offset))
}
