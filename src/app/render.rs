//! Terminal output for events, streams and services

#![warn(clippy::all, rust_2018_idioms)]

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use colored::Colorize;

use crate::app::data_plane::cloudwatch_logs::{LogEvent, LogStreamRef};

/// Label shown for the bucket of log groups without an inferred service
pub const UNGROUPED_LABEL: &str = "others";

/// RFC 3339 timestamp in `tz`, or the raw number if it is out of range
pub fn format_timestamp<Tz>(millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(utc) => utc
            .with_timezone(tz)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        None => millis.to_string(),
    }
}

pub fn service_label(service: &str) -> String {
    if service.is_empty() {
        UNGROUPED_LABEL.to_string()
    } else {
        service.to_string()
    }
}

/// Stream name followed by the wall-clock time of its last event
pub fn stream_label<Tz>(stream: &LogStreamRef, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let last_event = stream
        .last_event_time
        .and_then(DateTime::<Utc>::from_timestamp_millis);

    match last_event {
        Some(time) => format!(
            "{} - {}",
            stream.name,
            time.with_timezone(tz).format("%Y-%m-%d %H:%M:%S")
        ),
        None => stream.name.clone(),
    }
}

/// How events are written to the terminal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventRenderer {
    pub color: bool,
    /// Show times in UTC instead of the local zone
    pub utc: bool,
    /// One JSON object per line instead of text
    pub json: bool,
}

impl EventRenderer {
    pub fn new(color: bool, utc: bool) -> Self {
        Self {
            color,
            utc,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn timestamp(&self, millis: i64) -> String {
        if self.utc {
            format_timestamp(millis, &Utc)
        } else {
            format_timestamp(millis, &Local)
        }
    }

    pub fn stream_label(&self, stream: &LogStreamRef) -> String {
        if self.utc {
            stream_label(stream, &Utc)
        } else {
            stream_label(stream, &Local)
        }
    }

    /// `<timestamp>: <message>`, with the message's trailing newline removed
    pub fn line(&self, event: &LogEvent) -> String {
        let timestamp = self.timestamp(event.timestamp);
        let message = event.message.trim_end_matches(['\r', '\n']);

        if self.color {
            format!("{}: {}", timestamp.cyan(), message.green())
        } else {
            format!("{timestamp}: {message}")
        }
    }

    pub fn write_events<W: Write>(&self, out: &mut W, events: &[LogEvent]) -> Result<()> {
        for event in events {
            if self.json {
                serde_json::to_writer(&mut *out, event)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", self.line(event))?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    const NEW_YEAR_2024: i64 = 1_704_067_200_000;

    #[test]
    fn test_format_timestamp_utc() {
        insta::assert_snapshot!(format_timestamp(NEW_YEAR_2024, &Utc), @"2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_format_timestamp_with_offset() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        insta::assert_snapshot!(format_timestamp(NEW_YEAR_2024, &tz), @"2024-01-01T08:00:00+08:00");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(i64::MAX, &Utc), i64::MAX.to_string());
    }

    #[test]
    fn test_plain_line_trims_trailing_newline() {
        let renderer = EventRenderer::new(false, true);
        let event = LogEvent::new(NEW_YEAR_2024, "START RequestId: abc\n");

        insta::assert_snapshot!(
            renderer.line(&event),
            @"2024-01-01T00:00:00Z: START RequestId: abc"
        );
    }

    #[test]
    fn test_json_lines() {
        let renderer = EventRenderer::new(false, true).with_json(true);
        let events = vec![
            LogEvent::new(1, "a"),
            LogEvent::new(2, "b").with_stream("s"),
        ];

        let mut out = Vec::new();
        renderer.write_events(&mut out, &events).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"timestamp":1,"message":"a"}"#);
        assert_eq!(lines[1], r#"{"timestamp":2,"message":"b","log_stream_name":"s"}"#);
    }

    #[test]
    fn test_stream_label() {
        let stream = LogStreamRef::new("2024/01/01/[$LATEST]abc", Some(NEW_YEAR_2024 + 61_000));
        assert_eq!(
            stream_label(&stream, &Utc),
            "2024/01/01/[$LATEST]abc - 2024-01-01 00:01:01"
        );

        let idle = LogStreamRef::new("idle", None);
        assert_eq!(stream_label(&idle, &Utc), "idle");
    }

    #[test]
    fn test_service_label() {
        assert_eq!(service_label("/aws/lambda/"), "/aws/lambda/");
        assert_eq!(service_label(""), "others");
    }
}
