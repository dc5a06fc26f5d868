// Server loop module
// Accepts connections until the shutdown future resolves, then drains

use std::future::Future;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::connection::{accept_connection, ConnectionContext};
use super::shutdown::drain_connections;
use crate::handler::RequestHandler;
use crate::logger::{self, AccessLogFormat};

/// Configuration for server loop behavior
#[derive(Debug, Clone, Copy)]
pub struct ServerLoopConfig {
    /// Access log format, `None` disables the access log
    pub access_log: Option<AccessLogFormat>,
    /// How long open connections get to finish after shutdown starts
    pub drain_timeout: Duration,
}

/// Accept loop shared by both servers
///
/// Runs until `shutdown` resolves. The listener is closed first, open
/// connections are then asked to finish their current request and given
/// `drain_timeout` to do so.
///
/// Connection tasks are spawned with `spawn_local`, so this must run inside a
/// `tokio::task::LocalSet`.
pub async fn start_server_loop<H, S>(
    listener: TcpListener,
    handler: Arc<H>,
    config: ServerLoopConfig,
    shutdown: S,
) where
    H: RequestHandler,
    S: Future<Output = ()>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ctx = ConnectionContext {
        access_log: config.access_log,
        active_connections: Arc::clone(&active_connections),
        shutdown: shutdown_rx,
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &handler, &ctx);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    let _ = shutdown_tx.send(true);
    drain_connections(&active_connections, config.drain_timeout).await;
}
