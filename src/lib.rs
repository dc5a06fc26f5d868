//! Local development HTTP servers
//!
//! - `mime-server`: serves a directory with corrected MIME types and permissive CORS
//! - `proxy-server`: serves `src/` and forwards `/api/*` to a local API process

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod proxy;
pub mod server;
