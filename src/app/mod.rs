//! Core application modules for cwlr.
//!
//! # Module Organization
//!
//! ## AWS Integration
//! - [`data_plane`] - CloudWatch Logs client, pagination, grouping and queries
//!
//! ## Command Line
//! - [`cli`] - argument definitions
//! - [`commands`] - the `read`, `search` and `groups` commands
//! - [`config`] - `config.toml` loading
//!
//! ## Presentation
//! - [`prompt`] - interactive selection and text input
//! - [`render`] - event, stream and service formatting
//! - [`time_input`] - date and time parsing for searches
//!
//! # Architecture
//!
//! Data flows one way: [`data_plane`] lists and groups log groups, [`prompt`] lets the
//! operator pick one, [`data_plane`] drains the matching events and [`render`] prints
//! them. Only [`commands`] knows about all three.

pub mod cli;
pub mod commands;
pub mod config;
pub mod data_plane;
pub mod prompt;
pub mod render;
pub mod time_input;

pub use commands::Commands;
