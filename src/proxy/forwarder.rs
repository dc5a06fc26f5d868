//! One-shot request forwarding
//!
//! Every forwarded request gets its own outbound connection, closed once the
//! upstream response has been read in full.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue, HOST};
use hyper::http::request;
use hyper::{Request, Response, Uri};
use hyper_util::rt::TokioIo;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::logger;

/// Host every forwarded request is sent to
pub const API_TARGET_HOST: &str = "localhost";

/// Bound on connect + request + response of one forwarded exchange
pub const PROXY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Could not connect to API server")]
    ConnectionRefused,
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Http(#[from] hyper::Error),
    #[error("{0}")]
    InvalidRequest(#[from] hyper::http::Error),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Forwards requests to `<host>:<port>`
#[derive(Debug, Clone)]
pub struct Forwarder {
    host: String,
    port: u16,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(port: u16) -> Self {
        Self {
            host: API_TARGET_HOST.to_string(),
            port,
            timeout: PROXY_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `Host` value the outbound side sends
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Forward a request whose path starts with `prefix`
    ///
    /// The prefix is stripped, the query kept, `Host` replaced and every other
    /// header passed through. The upstream status, headers and body come back
    /// unchanged.
    pub async fn forward(
        &self,
        parts: &request::Parts,
        body: Bytes,
        prefix: &str,
    ) -> Result<Response<Full<Bytes>>, ProxyError> {
        let target = rewrite_target(&parts.uri, prefix);
        let mut outbound = Request::builder()
            .method(parts.method.clone())
            .uri(target.as_str())
            .body(Full::new(body))?;
        *outbound.headers_mut() = forward_headers(&parts.headers, &self.authority());

        match tokio::time::timeout(self.timeout, self.exchange(outbound)).await {
            Ok(result) => result,
            Err(_) => Err(ProxyError::Timeout(self.timeout)),
        }
    }

    async fn exchange(
        &self,
        outbound: Request<Full<Bytes>>,
    ) -> Result<Response<Full<Bytes>>, ProxyError> {
        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::ConnectionRefused => ProxyError::ConnectionRefused,
                _ => ProxyError::Io(e),
            })?;

        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
        let connection = tokio::spawn(async move {
            if let Err(e) = conn.await {
                logger::log_warning(&format!("Upstream connection error: {e}"));
            }
        });

        let response = sender.send_request(outbound).await?;
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();

        // Response fully read; closing the socket is all that is left
        connection.abort();

        Ok(Response::from_parts(parts, Full::new(body)))
    }
}

/// Strip `prefix` from the path and re-append the query
///
/// The result is always origin-form: an empty remainder becomes `/`, and a
/// remainder without a leading slash gets one.
pub fn rewrite_target(uri: &Uri, prefix: &str) -> String {
    let path = uri.path();
    let rest = path.strip_prefix(prefix).unwrap_or(path);

    let mut target = if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{rest}")
    };
    if let Some(query) = uri.query().filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    target
}

/// Incoming headers minus `Host`, plus the outbound connection's own `Host`
pub fn forward_headers(incoming: &HeaderMap, authority: &str) -> HeaderMap {
    let mut headers = incoming.clone();
    headers.remove(HOST);
    if let Ok(host) = HeaderValue::from_str(authority) {
        headers.insert(HOST, host);
    }
    headers
}
