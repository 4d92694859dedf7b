//! CloudWatch Logs Integration Module
//!
//! Browsing, reading and searching AWS CloudWatch Logs.
//!
//! ## Features
//!
//! - Two-level service → resource grouping of log group names
//! - Exhaustive, cancellable pagination of log groups and events
//! - Pattern and time range filtering across a log group
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cwlr::app::config::AwsSettings;
//! use cwlr::app::data_plane::cloudwatch_logs::{CloudWatchLogsClient, LogRetrieval, TimeRange};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = CloudWatchLogsClient::from_settings(&AwsSettings::default()).await;
//! let retrieval = LogRetrieval::new(Arc::new(client));
//!
//! let resources = retrieval.list_grouped_resources().await?;
//! for service in resources.services() {
//!     println!("{} ({} log groups)", service, resources.resources(&service).len());
//! }
//!
//! let errors = retrieval
//!     .search_events("/aws/lambda/my-function", "ERROR", TimeRange::unbounded())
//!     .await?;
//! for event in errors {
//!     println!("{}: {}", event.timestamp, event.message);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod client;
pub mod error;
pub mod grouping;
pub mod pagination;
pub mod retrieval;
pub mod types;

// Re-export commonly used types
pub use client::{CloudWatchLogsClient, LogsApi};
pub use error::RetrievalError;
pub use grouping::{split, ResourceMap};
pub use pagination::{PartialDrain, Paginator, RetryPolicy, StreamCursor};
pub use retrieval::LogRetrieval;
pub use types::{Cursor, LogEvent, LogStreamRef, Page, TimeRange};
