//! Data Plane Services Module
//!
//! AWS data plane integrations: code that reads data held inside AWS resources rather
//! than managing the resources themselves.
//!
//! ## Available Services
//!
//! - **CloudWatch Logs**: list log groups and streams, read streams, search log groups
//!
//! ## Architecture
//!
//! Each service is split into layers that can be tested without AWS access:
//!
//! ```text
//! 1. Remote operations (client.rs)
//!    └─ trait with one method per API call, implemented over the AWS SDK
//!
//! 2. Pagination (pagination.rs)
//!    └─ cursor loops with cancellation, timeout and retry
//!
//! 3. Query facade (retrieval.rs)
//!    └─ validated queries composed from the layers above
//! ```

pub mod cloudwatch_logs;

pub use cloudwatch_logs::{CloudWatchLogsClient, LogRetrieval, LogsApi, RetrievalError};
