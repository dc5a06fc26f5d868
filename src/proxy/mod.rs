//! Reverse proxy module
//!
//! Forwards `/api` requests of the proxy server to the local API process.

pub mod forwarder;

pub use forwarder::{Forwarder, ProxyError, API_TARGET_HOST, PROXY_TIMEOUT};
