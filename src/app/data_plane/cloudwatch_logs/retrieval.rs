//! Log Retrieval
//!
//! The queries the command layer runs against CloudWatch Logs, composed from the
//! pagination loops and the service grouping.

#![warn(clippy::all, rust_2018_idioms)]

use std::sync::Arc;

use super::client::LogsApi;
use super::error::RetrievalError;
use super::grouping::ResourceMap;
use super::pagination::{PartialDrain, Paginator, StreamCursor};
use super::types::{LogEvent, LogStreamRef, TimeRange};

/// Query facade over a [`LogsApi`]
pub struct LogRetrieval<A: LogsApi> {
    api: Arc<A>,
    paginator: Paginator,
}

impl<A: LogsApi> Clone for LogRetrieval<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            paginator: self.paginator.clone(),
        }
    }
}

impl<A: LogsApi> LogRetrieval<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self::with_paginator(api, Paginator::new())
    }

    /// Use `paginator`'s cancellation, retry and timeout settings for every loop
    pub fn with_paginator(api: Arc<A>, paginator: Paginator) -> Self {
        Self { api, paginator }
    }

    /// Every log group name, in the order the service returns them
    pub async fn list_log_groups(&self) -> Result<Vec<String>, RetrievalError> {
        let names = self
            .paginator
            .drain(|cursor| self.api.list_groups(cursor))
            .await?;

        trace_info!("Listed {} log groups", names.len());
        Ok(names)
    }

    /// Every log group, grouped by inferred service
    pub async fn list_grouped_resources(&self) -> Result<ResourceMap, RetrievalError> {
        let names = self.list_log_groups().await?;
        let map = ResourceMap::from_names(&names);

        trace_debug!(
            "Grouped {} log groups into {} services",
            map.resource_count(),
            map.len()
        );
        Ok(map)
    }

    /// First page of streams in a log group, most recently active first
    pub async fn list_streams(
        &self,
        log_group_name: &str,
    ) -> Result<Vec<LogStreamRef>, RetrievalError> {
        require("log group name", log_group_name)?;

        let streams = self.api.list_streams(log_group_name).await?;
        trace_info!("Listed {} streams in {}", streams.len(), log_group_name);
        Ok(streams)
    }

    /// All events of a stream, oldest first
    pub async fn fetch_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
    ) -> Result<Vec<LogEvent>, RetrievalError> {
        self.fetch_events_partial(log_group_name, log_stream_name)
            .await?
            .into_result()
    }

    /// Like [`LogRetrieval::fetch_events`], but keeps events fetched before a failure.
    /// Validation errors are still returned directly.
    pub async fn fetch_events_partial(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
    ) -> Result<PartialDrain<LogEvent>, RetrievalError> {
        require("log group name", log_group_name)?;
        require("log stream name", log_stream_name)?;

        let drained = StreamCursor::new(self.paginator.clone())
            .drain_partial(|cursor| {
                self.api
                    .list_events(log_group_name, log_stream_name, cursor)
            })
            .await;

        trace_info!(
            "Fetched {} events from {}/{}",
            drained.items.len(),
            log_group_name,
            log_stream_name
        );
        Ok(drained)
    }

    /// Events across a log group matching `pattern` within `range`. An empty pattern
    /// matches everything.
    pub async fn search_events(
        &self,
        log_group_name: &str,
        pattern: &str,
        range: TimeRange,
    ) -> Result<Vec<LogEvent>, RetrievalError> {
        self.search_events_partial(log_group_name, pattern, range)
            .await?
            .into_result()
    }

    pub async fn search_events_partial(
        &self,
        log_group_name: &str,
        pattern: &str,
        range: TimeRange,
    ) -> Result<PartialDrain<LogEvent>, RetrievalError> {
        require("log group name", log_group_name)?;
        range.validate()?;

        let pattern = Some(pattern).filter(|p| !p.trim().is_empty());

        let drained = self
            .paginator
            .drain_partial(|cursor| {
                self.api
                    .filter_events(log_group_name, pattern, range, cursor)
            })
            .await;

        trace_info!(
            "Search in {} (pattern {:?}, range {:?}) matched {} events",
            log_group_name,
            pattern,
            range,
            drained.items.len()
        );
        Ok(drained)
    }
}

fn require(what: &'static str, value: &str) -> Result<(), RetrievalError> {
    if value.trim().is_empty() {
        Err(RetrievalError::EmptyIdentifier(what))
    } else {
        Ok(())
    }
}
