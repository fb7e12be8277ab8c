use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use serde_json::json;

use talento::dates::{
    EXCEL_EPOCH, date_to_excel_serial, excel_serial_to_date, normalize_instant, parse_date_text,
    parse_sheet_date,
};

fn bogota() -> FixedOffset {
    FixedOffset::west_opt(5 * 3600).unwrap()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn serial_one_is_the_day_after_the_epoch() {
    assert_eq!(EXCEL_EPOCH, ymd(1899, 12, 30));
    assert_eq!(excel_serial_to_date(1.0), Some(ymd(1899, 12, 31)));
}

#[test]
fn serials_match_spreadsheet_dates() {
    assert_eq!(excel_serial_to_date(45292.0), Some(ymd(2024, 1, 1)));
    assert_eq!(excel_serial_to_date(33604.0), Some(ymd(1992, 1, 1)));
    assert_eq!(date_to_excel_serial(ymd(2024, 1, 1)), 45292);
}

#[test]
fn serials_and_dates_round_trip() {
    for date in [
        ymd(1900, 3, 1),
        ymd(1970, 1, 1),
        ymd(2000, 2, 29),
        ymd(2024, 1, 1),
        ymd(9999, 12, 31),
    ] {
        let serial = date_to_excel_serial(date);
        assert_eq!(excel_serial_to_date(serial as f64), Some(date), "{date}");
    }
    assert_eq!(date_to_excel_serial(ymd(1900, 3, 1)), 61);
    assert_eq!(date_to_excel_serial(ymd(9999, 12, 31)), 2_958_465);
}

#[test]
fn serial_time_fraction_is_dropped() {
    assert_eq!(excel_serial_to_date(45292.99), Some(ymd(2024, 1, 1)));
}

#[test]
fn out_of_range_serials_are_rejected() {
    assert_eq!(excel_serial_to_date(-1.0), None);
    assert_eq!(excel_serial_to_date(f64::NAN), None);
    assert_eq!(excel_serial_to_date(3_000_000.0), None);
}

#[test]
fn instants_use_the_business_timezone() {
    let late_utc = Utc.with_ymd_and_hms(2024, 7, 1, 3, 0, 0).unwrap();
    assert_eq!(normalize_instant(late_utc, bogota()), ymd(2024, 6, 30));

    let midday = Utc.with_ymd_and_hms(2024, 7, 1, 17, 0, 0).unwrap();
    assert_eq!(normalize_instant(midday, bogota()), ymd(2024, 7, 1));
}

#[test]
fn text_formats() {
    let offset = bogota();
    assert_eq!(parse_date_text("2024-03-15", offset), Some(ymd(2024, 3, 15)));
    assert_eq!(parse_date_text("15/03/2024", offset), Some(ymd(2024, 3, 15)));
    assert_eq!(parse_date_text("15-03-2024", offset), Some(ymd(2024, 3, 15)));
    assert_eq!(parse_date_text("2024/03/15", offset), Some(ymd(2024, 3, 15)));
    assert_eq!(parse_date_text(" 45292 ", offset), Some(ymd(2024, 1, 1)));
    assert_eq!(
        parse_date_text("2024-03-15T02:00:00Z", offset),
        Some(ymd(2024, 3, 14))
    );
    assert_eq!(parse_date_text("", offset), None);
    assert_eq!(parse_date_text("ayer", offset), None);
    assert_eq!(parse_date_text("31/02/2024", offset), None);
}

#[test]
fn calendar_dates_are_not_shifted() {
    // A stored date reads back as the same day regardless of offset
    let east = FixedOffset::east_opt(9 * 3600).unwrap();
    assert_eq!(parse_date_text("2024-01-01", east), Some(ymd(2024, 1, 1)));
    assert_eq!(parse_date_text("2024-01-01", bogota()), Some(ymd(2024, 1, 1)));
}

#[test]
fn sheet_cells() {
    let offset = bogota();
    assert_eq!(parse_sheet_date(&json!(45292), offset), Some(ymd(2024, 1, 1)));
    assert_eq!(parse_sheet_date(&json!(45292.5), offset), Some(ymd(2024, 1, 1)));
    assert_eq!(parse_sheet_date(&json!("01/01/2024"), offset), Some(ymd(2024, 1, 1)));
    assert_eq!(parse_sheet_date(&json!(null), offset), None);
    assert_eq!(parse_sheet_date(&json!(true), offset), None);
}
