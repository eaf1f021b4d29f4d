//! Small display helpers for scraped data.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse the loosely-formatted due-date strings platforms emit.
///
/// Returns `None` for anything unrecognized; callers keep the raw text
/// in that case.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw.replace('Z', "+00:00")) {
        return Some(dt.with_timezone(&Local));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local.from_local_datetime(&naive).single();
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            let naive = date.and_hms_opt(23, 59, 0)?;
            return Local.from_local_datetime(&naive).single();
        }
    }
    None
}

/// Human-readable rendering of a due-date string; falls back to the raw
/// text when it cannot be parsed.
pub fn format_due_date(raw: &str) -> String {
    if raw.trim().is_empty() {
        return "No due date".to_string();
    }
    match parse_due_date(raw) {
        Some(dt) => dt.format("%B %d, %Y at %I:%M %p").to_string(),
        None => raw.trim().to_string(),
    }
}

/// Time remaining until a due date, e.g. "2 days, 4 hours".
pub fn time_remaining(raw: &str) -> String {
    if raw.trim().is_empty() {
        return "No due date".to_string();
    }
    let Some(due) = parse_due_date(raw) else {
        return "Unknown".to_string();
    };

    let delta = due.signed_duration_since(Local::now());
    if delta.num_seconds() < 0 {
        return "Overdue".to_string();
    }

    let days = delta.num_days();
    let hours = delta.num_hours() % 24;
    let minutes = delta.num_minutes() % 60;
    if days > 0 {
        format!("{days} days, {hours} hours")
    } else if hours > 0 {
        format!("{hours} hours, {minutes} minutes")
    } else {
        format!("{minutes} minutes")
    }
}
