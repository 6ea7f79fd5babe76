use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use loadwatch::utils::datetime::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_format_ymd() {
    assert_eq!(format_ymd(day(2025, 1, 15)), "2025-01-15");
}

#[test]
fn test_parse_date() {
    assert_eq!(parse_date(" 2025-04-30 ").unwrap(), day(2025, 4, 30));
    assert!(parse_date("30/04/2025").is_err());
}

#[test]
fn test_format_today() {
    let today = format_today();
    assert_eq!(today.len(), 10);
    assert!(parse_date(&today).is_ok());
}

#[test]
fn test_parse_timestamp_shapes() {
    let expected = Utc.with_ymd_and_hms(2025, 4, 30, 10, 25, 0).unwrap();
    assert_eq!(parse_timestamp("2025-04-30T10:25:00Z"), Some(expected));
    assert_eq!(parse_timestamp("2025-04-30T13:25:00+03:00"), Some(expected));
    assert_eq!(parse_timestamp("2025-04-30T10:25:00"), Some(expected));
    assert_eq!(parse_timestamp("2025-04-30 10:25:00.000"), Some(expected));
    assert_eq!(
        parse_timestamp("2025-04-30"),
        Some(Utc.with_ymd_and_hms(2025, 4, 30, 0, 0, 0).unwrap())
    );
    assert_eq!(parse_timestamp(""), None);
    assert_eq!(parse_timestamp("yesterday"), None);
}

#[test]
fn test_last_days_range() {
    let range = DateRange::last_days(day(2025, 3, 10), 30);
    assert_eq!(range.start, day(2025, 2, 9));
    assert_eq!(range.end, day(2025, 3, 10));

    // A zero-day range still covers today
    let today_only = DateRange::last_days(day(2025, 3, 10), 0);
    assert_eq!(today_only.start, today_only.end);
}

#[test]
fn test_month_to_date() {
    let range = DateRange::month_to_date(day(2025, 2, 17));
    assert_eq!(range.start.day(), 1);
    assert_eq!(range.end, day(2025, 2, 17));
}

#[test]
fn test_reversed_bounds_are_swapped() {
    let range = DateRange::new(day(2025, 5, 1), day(2025, 4, 1));
    assert_eq!(range.start, day(2025, 4, 1));
    assert_eq!(range.end, day(2025, 5, 1));
}

#[test]
fn test_range_parse_and_display() {
    let range = DateRange::parse("2025-04-01..2025-04-30").unwrap();
    assert_eq!(range.to_string(), "2025-04-01..2025-04-30");
    assert_eq!(range.start_param(), "2025-04-01");
    assert!(DateRange::parse("2025-04-01").is_none());
}

#[test]
fn test_range_contains_is_inclusive() {
    let range = DateRange::new(day(2025, 4, 1), day(2025, 4, 30));
    assert!(range.contains(&Utc.with_ymd_and_hms(2025, 4, 30, 23, 59, 0).unwrap()));
    assert!(range.contains(&Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()));
    assert!(!range.contains(&Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()));
}
