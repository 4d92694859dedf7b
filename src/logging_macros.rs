#![warn(clippy::all, rust_2018_idioms)]

/// Tracing macros that prefix every message with `[module:line]`.
///
/// The log file is shared by every command run, so the location prefix is what ties a
/// line back to the code that wrote it.
#[macro_export]
macro_rules! trace_trace {
    ($($arg:tt)*) => {
        tracing::trace!("[{}:{}] {}", module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! trace_debug {
    ($($arg:tt)*) => {
        tracing::debug!("[{}:{}] {}", module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! trace_info {
    ($($arg:tt)*) => {
        tracing::info!("[{}:{}] {}", module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! trace_warn {
    ($($arg:tt)*) => {
        tracing::warn!("[{}:{}] {}", module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! trace_error {
    ($($arg:tt)*) => {
        tracing::error!("[{}:{}] {}", module_path!(), line!(), format!($($arg)*));
    };
}

/*
Example output in cwlr.log:
  2024-05-01T10:00:00.123Z DEBUG cwlr::app::data_plane::cloudwatch_logs::pagination:
    [cwlr::app::data_plane::cloudwatch_logs::pagination:171] Drained 312 item(s) across 4 page(s)

Keep per-event logging out of pagination loops; log once per page or per query.
*/
