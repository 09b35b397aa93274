//! Post date-text parsing.
//!
//! The forum listings render a post's date in one of four textual shapes:
//! a bare time of day ("14:30") for posts published today, a 2-digit year
//! with a trailing dot ("24.06.10."), the same without the dot, and a full
//! 4-digit year ("2024.06.10"). Rather than guessing the shape from the
//! text length, each candidate format is tried in order and must either
//! consume the whole input or fail; the first full match wins.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::collect::CollectError;

/// Date formats tried in order. The trailing-dot variant must come before
/// the bare 2-digit variant: chrono rejects unconsumed trailing input, so
/// the order only decides which of the two dotted cousins matches first.
const DATE_FORMATS: &[&str] = &["%y.%m.%d.", "%y.%m.%d", "%Y.%m.%d"];

/// Parse one date cell's text. `today` is the calendar date the "HH:MM"
/// shape is relative to; it is a parameter so tests can pin it.
pub fn parse_post_date_text(text: &str, today: NaiveDate) -> Result<NaiveDateTime, CollectError> {
    let text = text.trim();

    // Time-of-day shape first: posts from today carry no date at all
    if let Ok(time) = NaiveTime::parse_from_str(text, "%H:%M") {
        return Ok(today.and_time(time));
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    Err(CollectError::Parse(format!(
        "unrecognized date text: {:?}",
        text
    )))
}
