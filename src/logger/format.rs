//! Access log format module
//!
//! Supports three formats:
//! - `plain`: `<client> - "<request line>" <status> <bytes>`
//! - `timestamped`: `<client> - [<local time>] "<request line>" <status> <bytes>`
//! - `json` (JSON structured logging)

use chrono::Local;
use serde::Deserialize;

/// Access log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AccessLogFormat {
    #[default]
    Plain,
    Timestamped,
    Json,
}

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request target as sent by the client, query included
    pub target: String,
    /// HTTP version, e.g. `HTTP/1.1`
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, target: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            target,
            http_version: "HTTP/1.1".to_string(),
            status: 200,
            body_bytes: 0,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Plain => self.format_plain(),
            AccessLogFormat::Timestamped => self.format_timestamped(),
            AccessLogFormat::Json => self.format_json(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "\"{} {} {}\" {} {}",
            self.method, self.target, self.http_version, self.status, self.body_bytes
        )
    }

    fn format_plain(&self) -> String {
        format!("{} - {}", self.remote_addr, self.request_line())
    }

    fn format_timestamped(&self) -> String {
        format!(
            "{} - [{}] {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y %H:%M:%S"),
            self.request_line()
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "target": self.target,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }
}
