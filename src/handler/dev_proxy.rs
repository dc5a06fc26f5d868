//! Request dispatch of the proxy server
//!
//! Paths under `/api` go to the API process; everything else is a static file.

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response};
use std::path::PathBuf;

use super::{static_files, RequestHandler};
use crate::config::ProxyServerConfig;
use crate::http::{self, response};
use crate::logger;
use crate::proxy::{Forwarder, ProxyError};

/// Requests whose path starts with this are forwarded
pub const API_PREFIX: &str = "/api";

/// Handler of the proxy + static server
#[derive(Debug, Clone)]
pub struct DevProxy {
    static_root: PathBuf,
    forwarder: Forwarder,
    enable_cors: bool,
}

impl DevProxy {
    pub const fn new(static_root: PathBuf, forwarder: Forwarder, enable_cors: bool) -> Self {
        Self {
            static_root,
            forwarder,
            enable_cors,
        }
    }

    pub fn from_config(config: &ProxyServerConfig) -> std::io::Result<Self> {
        Ok(Self::new(
            config.static_root()?,
            Forwarder::new(config.api_target_port),
            config.enable_cors,
        ))
    }

    async fn forward(&self, req: Request<Incoming>) -> Response<Full<Bytes>> {
        let (parts, body) = req.into_parts();

        let result = match body.collect().await {
            Ok(collected) => {
                self.forwarder
                    .forward(&parts, collected.to_bytes(), API_PREFIX)
                    .await
            }
            Err(e) => Err(ProxyError::from(e)),
        };

        match result {
            Ok(upstream) => upstream,
            Err(err @ ProxyError::ConnectionRefused) => {
                self.local(http::build_502_response(&err.to_string()))
            }
            Err(err) => {
                logger::log_proxy_error(&err);
                self.local(http::build_502_response(&err.to_string()))
            }
        }
    }

    /// Finish a response generated here rather than upstream
    fn local(&self, mut resp: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
        if self.enable_cors {
            response::allow_any_origin(&mut resp);
        }
        resp
    }
}

impl RequestHandler for DevProxy {
    async fn handle(&self, req: Request<Incoming>) -> Response<Full<Bytes>> {
        match *req.method() {
            Method::GET | Method::POST | Method::PUT | Method::DELETE | Method::PATCH => {}
            ref other => return self.local(http::build_501_response(other)),
        }

        if req.uri().path().starts_with(API_PREFIX) {
            return self.forward(req).await;
        }

        let resp = static_files::serve_static(&self.static_root, req.uri().path()).await;
        self.local(resp)
    }
}
