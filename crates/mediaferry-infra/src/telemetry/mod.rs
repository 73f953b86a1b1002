//! Telemetry initialization
//!
//! This module installs the process-wide `tracing` subscriber.

mod init_basic;

pub use init_basic::{default_filter, init_telemetry, TelemetryError};
