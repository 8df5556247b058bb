//! Tracing initialization
//!
//! This module installs the `tracing` subscriber used by binaries and tests.

mod init_basic;

pub use init_basic::{init_telemetry, init_test_telemetry, shutdown_telemetry, LogFormat};
