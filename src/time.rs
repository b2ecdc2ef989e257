use chrono::{DateTime, Local, Utc};

const SECOND: u64 = 1;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Current unix timestamp in seconds.
pub fn current_timestamp() -> u64 {
    Utc::now().timestamp() as u64
}

/// Current unix timestamp in milliseconds.
pub fn current_millis() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// The current month as `YYYY-MM`, the period format used by the report endpoints.
pub fn current_period() -> String {
    Local::now().format("%Y-%m").to_string()
}

/// Formats a millisecond timestamp in the future as a human readable remaining time,
/// e.g. "in 3 hours". Timestamps in the past are reported as "expired".
pub fn format_until_millis(millis: u64) -> String {
    let now = current_millis();
    if millis <= now {
        return String::from("expired");
    }
    let remain = (millis - now) / 1000;

    let (value, unit) = if remain < MINUTE {
        (remain, "second")
    } else if remain < HOUR {
        (remain / MINUTE, "minute")
    } else if remain < DAY {
        (remain / HOUR, "hour")
    } else {
        (remain / DAY, "day")
    };

    if value > 1 {
        format!("in {value} {unit}s")
    } else {
        format!("in 1 {unit}")
    }
}

/// Render a millisecond timestamp as local RFC 3339, falling back to the raw number.
pub fn format_millis(millis: u64) -> String {
    match DateTime::from_timestamp_millis(millis as i64) {
        Some(time) => time.with_timezone(&Local).to_rfc3339(),
        None => millis.to_string(),
    }
}
