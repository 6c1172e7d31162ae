//! CLI command implementations

pub mod ask;
pub mod config;
