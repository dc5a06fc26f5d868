// Connection handling module
// Serves one accepted TCP connection and writes the access log

use hyper::body::{Body as _, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

use crate::handler::RequestHandler;
use crate::logger::{self, AccessLogEntry, AccessLogFormat};

/// Per-listener state every connection task needs
#[derive(Clone)]
pub struct ConnectionContext {
    pub access_log: Option<AccessLogFormat>,
    pub active_connections: Arc<AtomicUsize>,
    pub shutdown: watch::Receiver<bool>,
}

/// Accept a connection: count it and hand it to its own task.
pub fn accept_connection<H: RequestHandler>(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    handler: &Arc<H>,
    ctx: &ConnectionContext,
) {
    ctx.active_connections.fetch_add(1, Ordering::SeqCst);
    handle_connection(stream, peer_addr, Arc::clone(handler), ctx.clone());
}

/// Handle a single connection in a spawned local task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Serves HTTP/1.1 with keep-alive through the request handler
/// 3. Switches to graceful shutdown when the listener stops
/// 4. Decrements the connection counter when done
fn handle_connection<H: RequestHandler>(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    handler: Arc<H>,
    ctx: ConnectionContext,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);
        let access_log = ctx.access_log;
        let mut shutdown = ctx.shutdown;

        let service = service_fn(move |req: Request<Incoming>| {
            let handler = Arc::clone(&handler);
            async move {
                Ok::<_, Infallible>(serve_logged(handler.as_ref(), req, peer_addr, access_log).await)
            }
        });

        let conn = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service);
        tokio::pin!(conn);

        let mut shutting_down = *shutdown.borrow();
        if shutting_down {
            conn.as_mut().graceful_shutdown();
        }
        let result = loop {
            tokio::select! {
                res = conn.as_mut() => break res,
                _ = shutdown.changed(), if !shutting_down => {
                    shutting_down = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        };

        if let Err(err) = result {
            logger::log_connection_error(&err);
        }

        ctx.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Run the handler and emit one access log line for the exchange
async fn serve_logged<H: RequestHandler>(
    handler: &H,
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    access_log: Option<AccessLogFormat>,
) -> hyper::Response<http_body_util::Full<hyper::body::Bytes>> {
    let Some(format) = access_log else {
        return handler.handle(req).await;
    };

    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri()
            .path_and_query()
            .map_or_else(|| req.uri().to_string(), ToString::to_string),
    );
    entry.http_version = format!("{:?}", req.version());

    let response = handler.handle(req).await;

    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry, format);

    response
}
