//! Shared utilities for the server integration tests.

use devserve::handler::RequestHandler;
use devserve::logger::AccessLogFormat;
use devserve::server::{create_listener, start_server_loop, ServerLoopConfig};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::HeaderMap;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// Response as seen by a test client
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Reply {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Request as received by the mock upstream
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub target: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub const fn loop_config() -> ServerLoopConfig {
    ServerLoopConfig {
        access_log: Some(AccessLogFormat::Plain),
        drain_timeout: Duration::from_secs(2),
    }
}

/// Start a server on an ephemeral port; must be called inside a `LocalSet`.
#[allow(dead_code)]
pub fn spawn_server<H: RequestHandler>(handler: H) -> SocketAddr {
    spawn_server_until(handler, std::future::pending()).0
}

/// Start a server that stops when `shutdown` resolves; the handle resolves once it has drained.
pub fn spawn_server_until<H, S>(handler: H, shutdown: S) -> (SocketAddr, tokio::task::JoinHandle<()>)
where
    H: RequestHandler,
    S: Future<Output = ()> + 'static,
{
    let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::task::spawn_local(start_server_loop(
        listener,
        Arc::new(handler),
        loop_config(),
        shutdown,
    ));
    (addr, handle)
}

/// Send one request over a fresh connection.
pub async fn send(
    addr: SocketAddr,
    method: Method,
    path: &str,
    headers: &[(&str, &str)],
    body: Bytes,
) -> Reply {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .unwrap();
    tokio::spawn(async move {
        let _ = conn.await;
    });

    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header("host", addr.to_string());
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let response = sender
        .send_request(builder.body(Full::new(body)).unwrap())
        .await
        .unwrap();
    let (parts, body) = response.into_parts();
    let body = body.collect().await.unwrap().to_bytes();

    Reply {
        status: parts.status,
        headers: parts.headers,
        body,
    }
}

#[allow(dead_code)]
pub async fn get(addr: SocketAddr, path: &str) -> Reply {
    send(addr, Method::GET, path, &[], Bytes::new()).await
}

/// Start a mock API that records every request and answers
/// `201` with `x-upstream: mock` and a small JSON body.
#[allow(dead_code)]
pub async fn start_upstream() -> (u16, Arc<Mutex<Vec<Captured>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let store = Arc::clone(&captured);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let store = Arc::clone(&store);
                    async move {
                        let (parts, body) = req.into_parts();
                        let body = body.collect().await?.to_bytes();
                        store.lock().unwrap().push(Captured {
                            method: parts.method,
                            target: parts.uri.to_string(),
                            headers: parts.headers,
                            body,
                        });
                        Ok::<_, hyper::Error>(
                            Response::builder()
                                .status(201)
                                .header("x-upstream", "mock")
                                .header("content-type", "application/json")
                                .body(Full::new(Bytes::from_static(b"{\"ok\":true}")))
                                .unwrap(),
                        )
                    }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    (port, captured)
}

/// A port nothing listens on
#[allow(dead_code)]
pub async fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
