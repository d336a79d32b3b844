//! # Date Cast Post-Pass
//!
//! Converts the extracted JSON document into a [`Shaped`] document and
//! replaces every registered date string with a native value:
//!
//! - `format: date` must be exactly `YYYY-MM-DD` and a real calendar day.
//! - `format: date-time` must be an RFC 3339 timestamp; the offset is kept.
//!
//! A value that does not parse, or is not a string at all, is left as
//! it was. This pass never fails.

use chrono::{DateTime, NaiveDate};
use reqshape_core::{get_path, set_path, Shaped};
use reqshape_schema::DateFormat;
use serde_json::Value;

use crate::registry::DateCast;

/// The date-cast pass.
pub struct DateCastPostProcessor;

impl DateCastPostProcessor {
    /// Apply `casts` to `document`, producing a new shaped document.
    pub fn cast(document: Value, casts: &[DateCast]) -> Shaped {
        let mut shaped = Shaped::from(document);
        let mut converted = 0usize;

        for cast in casts {
            let parsed = match get_path(&shaped, &cast.path) {
                Some(Shaped::String(text)) => parse_date_value(text, cast.format),
                _ => None,
            };
            match parsed {
                Some(value) => {
                    set_path(&mut shaped, &cast.path, value);
                    converted += 1;
                }
                None => {
                    tracing::trace!(path = %cast.path, format = ?cast.format, "left uncast");
                }
            }
        }

        tracing::trace!(registered = casts.len(), converted, "date cast pass complete");
        shaped
    }
}

/// Parse `text` under `format`, or `None` if it does not conform.
pub fn parse_date_value(text: &str, format: DateFormat) -> Option<Shaped> {
    match format {
        DateFormat::Date => parse_calendar_date(text).map(Shaped::Date),
        DateFormat::DateTime => DateTime::parse_from_rfc3339(text).ok().map(Shaped::DateTime),
    }
}

/// Strict `YYYY-MM-DD`: fixed width, zero-padded, valid calendar day.
fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
