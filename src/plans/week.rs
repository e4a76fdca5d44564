//! Week arithmetic for plans, which are keyed by the Monday of their week.

use time::{macros::format_description, Date, Duration, OffsetDateTime};

pub fn monday_of(date: Date) -> Date {
    date - Duration::days(date.weekday().number_days_from_monday() as i64)
}

/// Monday of the current week in UTC.
pub fn current_monday() -> Date {
    monday_of(OffsetDateTime::now_utc().date())
}

pub fn next_monday(monday: Date) -> Date {
    monday + Duration::weeks(1)
}

pub fn previous_monday(monday: Date) -> Date {
    monday - Duration::weeks(1)
}

pub fn same_week(a: Date, b: Date) -> bool {
    monday_of(a) == monday_of(b)
}

pub fn format_week_start(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

pub fn parse_week_start(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
}

/// "Dec 16 - Dec 22, 2024" for the week starting on `monday`.
pub fn week_range_label(monday: Date) -> String {
    let sunday = monday + Duration::days(6);
    let start = monday
        .format(format_description!("[month repr:short] [day padding:none]"))
        .unwrap_or_default();
    let end = sunday
        .format(format_description!(
            "[month repr:short] [day padding:none], [year]"
        ))
        .unwrap_or_default();
    format!("{} - {}", start, end)
}
