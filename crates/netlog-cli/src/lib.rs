//! CLI library components for the network log charts.

pub mod commands;
pub mod logging;
pub mod summary;
