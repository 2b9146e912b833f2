//! Calendar-day normalization in the fixed display timezone (UTC+9).
//!
//! Every date the engine works with is a `NaiveDate` meaning "the calendar
//! day in UTC+9". Day differences between them are therefore independent of
//! the machine's local timezone.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

use crate::error::LayoutError;

/// Display timezone offset in seconds east of UTC.
pub const DISPLAY_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// Formats tried by the fallback parser, in order.
const FALLBACK_FORMATS: &[&str] = &["%Y/%m/%d", "%d/%m/%Y", "%d.%m.%Y", "%Y%m%d", "%Y.%m.%d"];

const FALLBACK_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

pub fn display_offset() -> FixedOffset {
    // In range, so the fallback is unreachable.
    FixedOffset::east_opt(DISPLAY_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Strict parse: a plain `YYYY-MM-DD` day, or an RFC 3339 instant shifted
/// into the display timezone.
pub fn normalize_date(s: &str) -> Result<NaiveDate, LayoutError> {
    let trimmed = s.trim();
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(day);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&display_offset()).date_naive());
    }
    Err(LayoutError::InvalidDate(s.to_string()))
}

/// Best-effort parse used when [`normalize_date`] fails. Naive timestamps are
/// read as already being in the display timezone.
pub fn normalize_date_lenient(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in FALLBACK_FORMATS {
        if let Ok(day) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(day);
        }
    }
    for fmt in FALLBACK_DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(ts.date());
        }
    }
    None
}

/// Strict parse, then fallback. Empty input is an `InvalidDate` as well.
pub fn resolve(s: &str) -> Result<NaiveDate, LayoutError> {
    normalize_date(s).or_else(|err| normalize_date_lenient(s).ok_or(err))
}

/// The current calendar day in the display timezone.
pub fn today_in_display_tz() -> NaiveDate {
    day_of(Utc::now())
}

/// The display-timezone calendar day containing `instant`.
pub fn day_of(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&display_offset()).date_naive()
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn add_days(day: NaiveDate, days: i64) -> NaiveDate {
    day + Duration::days(days)
}
