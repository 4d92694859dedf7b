//! Date and time input for searches.
//!
//! Everything is interpreted as UTC and converted to Unix milliseconds before it reaches
//! the retrieval layer.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| anyhow!("invalid date format, expected YYYY-MM-DD"))
}

pub fn parse_time(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), TIME_FORMAT)
        .map_err(|_| anyhow!("invalid time format, expected HH:MM:SS"))
}

/// Unix milliseconds of a UTC date and time
pub fn to_millis(date: NaiveDate, time: NaiveTime) -> i64 {
    NaiveDateTime::new(date, time).and_utc().timestamp_millis()
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DDTHH:MM:SS` into Unix
/// milliseconds. A bare date means midnight.
pub fn parse_instant(input: &str) -> Result<i64> {
    let input = input.trim();

    match input.split_once(['T', ' ']) {
        Some((date, time)) => Ok(to_millis(parse_date(date)?, parse_time(time)?)),
        None => Ok(to_millis(parse_date(input)?, NaiveTime::MIN)),
    }
}

/// Prompt validator: blank (no bound) or a date
pub fn validate_optional_date(input: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        return Ok(());
    }
    parse_date(input).map(|_| ()).map_err(|e| e.to_string())
}

pub fn validate_time(input: &str) -> Result<(), String> {
    parse_time(input).map(|_| ()).map_err(|e| e.to_string())
}
