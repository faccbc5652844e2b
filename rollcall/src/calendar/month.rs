//! Month arithmetic for the calendar grid. Months are zero-based (0 = January).

use chrono::{Datelike, Month, NaiveDate};

/// Last zero-based month.
pub const DECEMBER: u32 = 11;

pub const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// English name of a zero-based month.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_add(1)
        .and_then(|m| u8::try_from(m).ok())
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

/// Weekday of the first day of the month, Sunday = 0.
pub fn first_weekday(month: u32, year: i32) -> u32 {
    month
        .checked_add(1)
        .and_then(|m| NaiveDate::from_ymd_opt(year, m, 1))
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Number of days in a zero-based month.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    let (next_year, next_month) = match month {
        0..DECEMBER => (year, month + 2),
        DECEMBER => (year + 1, 1),
        _ => return 0,
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

/// Step a zero-based month by `direction`, wrapping across years.
pub fn step(month: u32, year: i32, direction: i32) -> (u32, i32) {
    let total = year * 12 + month as i32 + direction;
    (total.rem_euclid(12) as u32, total.div_euclid(12))
}

/// `DD/MM/YYYY` for a date.
pub fn format_date(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{}", date.day(), date.month(), date.year())
}

/// English weekday name, e.g. `Friday`.
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}
