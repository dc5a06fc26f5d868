// Configuration types module
// Defines the startup configuration of both servers

use serde::Deserialize;
use std::path::PathBuf;

use crate::logger::AccessLogFormat;

/// Proxy + static server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ProxyServerConfig {
    pub bind_host: String,
    pub port: u16,
    pub api_target_port: u16,
    /// Static root, relative to the working directory
    pub static_dir: String,
    pub enable_cors: bool,
    /// Seconds to wait for open connections on shutdown
    pub shutdown_timeout: u64,
    pub logging: LoggingConfig,
}

/// MIME-correcting static server configuration
#[derive(Debug, Clone)]
pub struct StaticServerConfig {
    pub bind_host: String,
    pub port: u16,
    pub root: PathBuf,
    pub shutdown_timeout: u64,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (plain, timestamped, json)
    #[serde(default)]
    pub access_log_format: AccessLogFormat,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

impl LoggingConfig {
    /// Stdout/stderr logging with the given access log format
    pub const fn console(access_log_format: AccessLogFormat) -> Self {
        Self {
            access_log: true,
            access_log_format,
            access_log_file: None,
            error_log_file: None,
        }
    }

    /// Format to hand to the server loop, `None` when access logging is off
    pub const fn access_format(&self) -> Option<AccessLogFormat> {
        if self.access_log {
            Some(self.access_log_format)
        } else {
            None
        }
    }
}
