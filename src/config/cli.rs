// Command line of the MIME-correcting static server

use clap::Parser;
use std::path::PathBuf;

use super::types::{LoggingConfig, StaticServerConfig};
use crate::logger::AccessLogFormat;

/// Serve a directory with corrected MIME types and permissive CORS
#[derive(Debug, Parser)]
#[command(name = "mime-server", version, about)]
pub struct StaticServerArgs {
    /// Port to listen on
    #[arg(default_value_t = 8080)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Directory to serve (defaults to the directory containing this executable)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Access log format
    #[arg(long, value_enum, default_value_t = AccessLogFormat::Plain)]
    pub log_format: AccessLogFormat,

    /// Disable the per-request access log
    #[arg(long)]
    pub no_access_log: bool,
}

impl StaticServerArgs {
    pub fn into_config(self) -> std::io::Result<StaticServerConfig> {
        let root = match self.root {
            Some(root) => root,
            None => executable_dir()?,
        };
        let mut logging = LoggingConfig::console(self.log_format);
        logging.access_log = !self.no_access_log;

        Ok(StaticServerConfig {
            bind_host: self.bind,
            port: self.port,
            root,
            shutdown_timeout: 5,
            logging,
        })
    }
}

fn executable_dir() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(PathBuf::from).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Executable has no parent directory: {}", exe.display()),
        )
    })
}
