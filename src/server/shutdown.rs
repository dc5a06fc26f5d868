// Shutdown module
// Waits for open connections after the listener has been closed

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::logger;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Wait until `active_connections` drops to zero or `grace` elapses.
///
/// Returns `true` when every connection finished in time. Connections still
/// open at the deadline are abandoned; the runtime drops them on exit.
pub async fn drain_connections(active_connections: &AtomicUsize, grace: Duration) -> bool {
    logger::log_draining(active_connections.load(Ordering::SeqCst));

    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let open = active_connections.load(Ordering::SeqCst);
        if open == 0 {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_drain_timeout(open);
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
