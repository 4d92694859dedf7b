//! CloudWatch Logs Client Wrapper
//!
//! [`LogsApi`] is the seam between the retrieval engine and the remote service: one
//! method per remote operation, each returning a single page. [`CloudWatchLogsClient`]
//! implements it over the AWS SDK.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_cloudwatchlogs as cloudwatchlogs;
use aws_sdk_cloudwatchlogs::types::OrderBy;

use crate::app::config::AwsSettings;

use super::types::{Cursor, LogEvent, LogStreamRef, Page, TimeRange};

/// Remote operations of the logging service
#[async_trait]
pub trait LogsApi: Send + Sync {
    /// One page of log group names
    async fn list_groups(&self, cursor: Cursor) -> Result<Page<String>>;

    /// First page of streams in a log group, most recently active first
    async fn list_streams(&self, log_group_name: &str) -> Result<Vec<LogStreamRef>>;

    /// One page of a stream's events, oldest first. The returned cursor is never
    /// `None`; it repeats once the end of the stream is reached.
    async fn list_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        cursor: Cursor,
    ) -> Result<Page<LogEvent>>;

    /// One page of events across a log group matching `pattern` within `range`
    async fn filter_events(
        &self,
        log_group_name: &str,
        pattern: Option<&str>,
        range: TimeRange,
        cursor: Cursor,
    ) -> Result<Page<LogEvent>>;
}

/// CloudWatch Logs client wrapper
#[derive(Clone)]
pub struct CloudWatchLogsClient {
    client: cloudwatchlogs::Client,
}

impl CloudWatchLogsClient {
    pub fn new(client: cloudwatchlogs::Client) -> Self {
        Self { client }
    }

    /// Resolve credentials and region from the default provider chain, honouring an
    /// explicit profile or region when given
    pub async fn from_settings(settings: &AwsSettings) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }

        let aws_config = loader.load().await;
        trace_info!(
            "CloudWatch Logs client configured for region {:?}",
            aws_config.region()
        );

        Self::new(cloudwatchlogs::Client::new(&aws_config))
    }
}

#[async_trait]
impl LogsApi for CloudWatchLogsClient {
    async fn list_groups(&self, cursor: Cursor) -> Result<Page<String>> {
        let response = self
            .client
            .describe_log_groups()
            .set_next_token(cursor)
            .send()
            .await
            .context("Failed to list log groups")?;

        let names = response
            .log_groups
            .unwrap_or_default()
            .into_iter()
            .filter_map(|group| group.log_group_name)
            .collect();

        Ok(Page::new(names, response.next_token))
    }

    async fn list_streams(&self, log_group_name: &str) -> Result<Vec<LogStreamRef>> {
        let response = self
            .client
            .describe_log_streams()
            .log_group_name(log_group_name)
            .order_by(OrderBy::LastEventTime)
            .descending(true)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to list log streams for log group: {}",
                    log_group_name
                )
            })?;

        let mut log_streams = Vec::new();

        if let Some(streams) = response.log_streams {
            for stream in streams {
                if let Some(name) = stream.log_stream_name {
                    log_streams.push(LogStreamRef::new(name, stream.last_event_timestamp));
                }
            }
        }

        Ok(log_streams)
    }

    async fn list_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        cursor: Cursor,
    ) -> Result<Page<LogEvent>> {
        let response = self
            .client
            .get_log_events()
            .log_group_name(log_group_name)
            .log_stream_name(log_stream_name)
            .start_from_head(true)
            .set_next_token(cursor)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to get log events from {}/{}",
                    log_group_name, log_stream_name
                )
            })?;

        let events = response
            .events
            .unwrap_or_default()
            .into_iter()
            .map(|event| {
                LogEvent::new(
                    event.timestamp.unwrap_or(0),
                    event.message.unwrap_or_default(),
                )
            })
            .collect();

        Ok(Page::new(events, response.next_forward_token))
    }

    async fn filter_events(
        &self,
        log_group_name: &str,
        pattern: Option<&str>,
        range: TimeRange,
        cursor: Cursor,
    ) -> Result<Page<LogEvent>> {
        let mut request = self
            .client
            .filter_log_events()
            .log_group_name(log_group_name)
            .set_start_time(range.start)
            .set_end_time(range.end)
            .set_next_token(cursor);

        if let Some(pattern) = pattern {
            request = request.filter_pattern(pattern);
        }

        let response = request.send().await.with_context(|| {
            format!(
                "Failed to query log events from log group: {}",
                log_group_name
            )
        })?;

        let mut events = Vec::new();

        if let Some(aws_events) = response.events {
            for event in aws_events {
                let mut log_event = LogEvent::new(
                    event.timestamp.unwrap_or(0),
                    event.message.unwrap_or_default(),
                );
                log_event.log_stream_name = event.log_stream_name;
                events.push(log_event);
            }
        }

        Ok(Page::new(events, response.next_token))
    }
}
