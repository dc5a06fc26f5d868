// Configuration module entry point
// Loads the immutable startup configuration of both servers

mod cli;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

pub use cli::StaticServerArgs;
pub use types::{LoggingConfig, ProxyServerConfig, StaticServerConfig};

/// Optional proxy configuration file in the working directory (any format `config` understands)
pub const PROXY_CONFIG_FILE: &str = "proxy-server";

impl ProxyServerConfig {
    /// Load from `proxy-server.*` and the process environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(PROXY_CONFIG_FILE, None)
    }

    /// Load configuration from the given file path (without extension)
    ///
    /// `env` replaces the process environment when set. Environment beats file,
    /// file beats defaults.
    pub fn load_from(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::default().try_parsing(true).source(env))
            .set_default("bind_host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("api_target_port", 3001)?
            .set_default("static_dir", "src")?
            .set_default("enable_cors", true)?
            .set_default("shutdown_timeout", 5)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "timestamped")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        socket_addr(&self.bind_host, self.port)
    }

    /// Absolute static root: `<cwd>/<static_dir>`
    pub fn static_root(&self) -> std::io::Result<PathBuf> {
        Ok(std::env::current_dir()?.join(&self.static_dir))
    }
}

impl StaticServerConfig {
    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        socket_addr(&self.bind_host, self.port)
    }
}

fn socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    format!("{host}:{port}")
        .parse()
        .map_err(|e| format!("Invalid address '{host}:{port}': {e}"))
}
