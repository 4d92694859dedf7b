//! Scripted stand-in for the CloudWatch Logs API.
//!
//! Pages are looked up by the cursor a call carries, so a test describes the remote
//! result set as a cursor → page table and then asserts on the calls that were made.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cwlr::app::data_plane::cloudwatch_logs::{
    Cursor, LogEvent, LogStreamRef, LogsApi, Page, TimeRange,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListGroups(Cursor),
    ListStreams(String),
    ListEvents(String, String, Cursor),
    FilterEvents(String, Option<String>, TimeRange, Cursor),
}

#[derive(Default)]
pub struct FakeLogs {
    pub group_pages: HashMap<Cursor, Page<String>>,
    pub streams: HashMap<String, Vec<LogStreamRef>>,
    pub event_pages: HashMap<Cursor, Page<LogEvent>>,
    pub filter_pages: HashMap<Cursor, Page<LogEvent>>,
    /// Cursors whose fetch always fails with this message
    pub failures: HashMap<Cursor, String>,
    /// Cursors whose next fetch fails once with this message
    pub transient_failures: Mutex<HashMap<Cursor, String>>,
    pub calls: Mutex<Vec<Call>>,
}

pub fn cursor(token: &str) -> Cursor {
    Some(token.to_string())
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn events(items: &[(i64, &str)]) -> Vec<LogEvent> {
    items
        .iter()
        .map(|(timestamp, message)| LogEvent::new(*timestamp, *message))
        .collect()
}

impl FakeLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log group listing split into pages `None → "g1" → "g2" → ... → null`
    pub fn with_group_pages(mut self, pages: &[&[&str]]) -> Self {
        for (index, page) in pages.iter().enumerate() {
            let sent = if index == 0 {
                None
            } else {
                cursor(&format!("g{index}"))
            };
            let next = if index + 1 < pages.len() {
                cursor(&format!("g{}", index + 1))
            } else {
                None
            };
            self.group_pages
                .insert(sent, Page::new(names(page), next));
        }
        self
    }

    /// Stream pages `None → "f1" → "f2" → ...`; the final cursor repeats like GetLogEvents
    pub fn with_event_pages(mut self, pages: Vec<Vec<LogEvent>>) -> Self {
        let count = pages.len();
        for (index, page) in pages.into_iter().enumerate() {
            let sent = if index == 0 {
                None
            } else {
                cursor(&format!("f{index}"))
            };
            self.event_pages
                .insert(sent, Page::new(page, cursor(&format!("f{}", index + 1))));
        }
        // End of stream: an empty page handing back the cursor it was sent
        let last = cursor(&format!("f{count}"));
        if count == 0 {
            self.event_pages
                .insert(None, Page::new(Vec::new(), last.clone()));
        }
        self.event_pages
            .insert(last.clone(), Page::new(Vec::new(), last));
        self
    }

    /// Search pages `None → "s1" → ... → null`
    pub fn with_filter_pages(mut self, pages: Vec<Vec<LogEvent>>) -> Self {
        let count = pages.len();
        for (index, page) in pages.into_iter().enumerate() {
            let sent = if index == 0 {
                None
            } else {
                cursor(&format!("s{index}"))
            };
            let next = if index + 1 < count {
                cursor(&format!("s{}", index + 1))
            } else {
                None
            };
            self.filter_pages.insert(sent, Page::new(page, next));
        }
        self
    }

    pub fn with_streams(mut self, log_group: &str, streams: Vec<LogStreamRef>) -> Self {
        self.streams.insert(log_group.to_string(), streams);
        self
    }

    pub fn failing_at(mut self, at: Cursor, message: &str) -> Self {
        self.failures.insert(at, message.to_string());
        self
    }

    pub fn failing_once_at(self, at: Cursor, message: &str) -> Self {
        self.transient_failures
            .lock()
            .unwrap()
            .insert(at, message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn lookup<T: Clone>(
        &self,
        table: &HashMap<Cursor, Page<T>>,
        at: &Cursor,
    ) -> Result<Page<T>> {
        if let Some(message) = self.failures.get(at) {
            return Err(anyhow!(message.clone()));
        }
        if let Some(message) = self.transient_failures.lock().unwrap().remove(at) {
            return Err(anyhow!(message));
        }
        table
            .get(at)
            .cloned()
            .ok_or_else(|| anyhow!("no page scripted for cursor {:?}", at))
    }
}

#[async_trait]
impl LogsApi for FakeLogs {
    async fn list_groups(&self, cursor: Cursor) -> Result<Page<String>> {
        self.record(Call::ListGroups(cursor.clone()));
        self.lookup(&self.group_pages, &cursor)
    }

    async fn list_streams(&self, log_group_name: &str) -> Result<Vec<LogStreamRef>> {
        self.record(Call::ListStreams(log_group_name.to_string()));
        self.streams
            .get(log_group_name)
            .cloned()
            .ok_or_else(|| anyhow!("ResourceNotFoundException: {}", log_group_name))
    }

    async fn list_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        cursor: Cursor,
    ) -> Result<Page<LogEvent>> {
        self.record(Call::ListEvents(
            log_group_name.to_string(),
            log_stream_name.to_string(),
            cursor.clone(),
        ));
        self.lookup(&self.event_pages, &cursor)
    }

    async fn filter_events(
        &self,
        log_group_name: &str,
        pattern: Option<&str>,
        range: TimeRange,
        cursor: Cursor,
    ) -> Result<Page<LogEvent>> {
        self.record(Call::FilterEvents(
            log_group_name.to_string(),
            pattern.map(str::to_string),
            range,
            cursor.clone(),
        ));
        self.lookup(&self.filter_pages, &cursor)
    }
}
