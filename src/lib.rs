//! cwlr - Interactive CloudWatch Logs Reader
//!
//! cwlr lets an operator browse the log groups of an AWS account, drill into a log stream
//! and read it from the beginning, or search a whole log group with a filter pattern and
//! time range, all from the terminal.
//!
//! # Core Features
//!
//! - **Service Grouping**: hundreds of log groups folded into service → resource
//!   (`/aws/lambda/` → `orders-api`) for two-step selection
//! - **Complete Retrieval**: every page of log groups and events is drained, with
//!   cancellation between pages and optional per-page retry and timeout
//! - **Search**: CloudWatch filter patterns with optional start and end times
//!
//! # Architecture Overview
//!
//! - **Retrieval Layer** ([`app::data_plane::cloudwatch_logs`]): the `LogsApi` seam over
//!   the AWS SDK, the pagination loops, service grouping and the `LogRetrieval` facade
//! - **Command Layer** ([`app::commands`], [`app::cli`]): argument handling and the
//!   `read`, `search` and `groups` flows
//! - **Presentation** ([`app::prompt`], [`app::render`]): selection prompts and output
//!
//! The retrieval layer holds no global state; cancellation, retry and display options are
//! passed in explicitly, which is what lets the tests drive it with scripted pages.

#![warn(clippy::all, rust_2018_idioms)]

// Include logging macros first
#[macro_use]
pub mod logging_macros;

pub mod app;
