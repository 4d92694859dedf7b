//! CloudWatch Logs Data Types
//!
//! Request-scoped values exchanged between the remote operations, the pagination
//! loops and the presentation layer.

#![warn(clippy::all, rust_2018_idioms)]

use serde::{Deserialize, Serialize};

use super::error::RetrievalError;

/// Opaque continuation token. `None` means "no more pages" for every operation
/// except event retrieval, which signals the end by repeating the token.
pub type Cursor = Option<String>;

/// One page of results from a cursor-based remote operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Cursor,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next: Cursor) -> Self {
        Self { items, next }
    }

    /// A page with no continuation
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// A single log event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Event timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Log message content
    pub message: String,
    /// Stream the event belongs to, when the remote call reports it
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub log_stream_name: Option<String>,
}

impl LogEvent {
    pub fn new(timestamp: i64, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
            log_stream_name: None,
        }
    }

    pub fn with_stream(mut self, log_stream_name: impl Into<String>) -> Self {
        self.log_stream_name = Some(log_stream_name.into());
        self
    }
}

/// A log stream and the time of its most recent event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStreamRef {
    pub name: String,
    /// Unix milliseconds; absent for streams that never received an event
    pub last_event_time: Option<i64>,
}

impl LogStreamRef {
    pub fn new(name: impl Into<String>, last_event_time: Option<i64>) -> Self {
        Self {
            name: name.into(),
            last_event_time,
        }
    }
}

/// Optional time bounds for a search, in Unix milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl TimeRange {
    /// Both ends open
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build a range, rejecting an end that precedes the start
    pub fn new(start: Option<i64>, end: Option<i64>) -> Result<Self, RetrievalError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), RetrievalError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => {
                Err(RetrievalError::InvalidRange { start, end })
            }
            _ => Ok(()),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}
