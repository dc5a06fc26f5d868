//! Logger module
//!
//! Provides logging utilities for both servers:
//! - Server lifecycle logging
//! - Access logging in several formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::LoggingConfig;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup. Before that every line goes
/// to stdout/stderr.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Write to the info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to the error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_info(message: &str) {
    write_info(message);
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Failures on the `/api` forwarding path
pub fn log_proxy_error(err: &impl std::fmt::Display) {
    write_error(&format!("Proxy error: {err}"));
}

/// Failures reading a static file that was found
pub fn log_file_error(err: &impl std::fmt::Display) {
    write_error(&format!("Error serving file: {err}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    write_info(&entry.format(format));
}

pub fn log_shutdown_requested(signal: &str) {
    write_info(&format!("\n[SIGNAL] {signal} received, shutting down..."));
}

pub fn log_draining(open_connections: usize) {
    if open_connections > 0 {
        write_info(&format!(
            "[SHUTDOWN] Waiting for {open_connections} open connection(s) to finish"
        ));
    }
}

pub fn log_drain_timeout(open_connections: usize) {
    log_warning(&format!(
        "Shutdown grace period elapsed with {open_connections} connection(s) still open"
    ));
}

pub fn log_listening(addr: &SocketAddr) {
    write_info(&format!("[SERVER] Listening on {addr}"));
}
