use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

use devserve::config::{StaticServerArgs, StaticServerConfig};
use devserve::handler::StaticSite;
use devserve::logger;
use devserve::server::{self, ServerLoopConfig, ShutdownSignals};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = StaticServerArgs::parse().into_config()?;
    logger::init(&cfg.logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: StaticServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let signals = ShutdownSignals::register()?;
    let handler = Arc::new(StaticSite::new(cfg.root.clone()));

    logger::log_listening(&addr);
    logger::log_info(&format!(
        "Serving {} at http://localhost:{}/",
        handler.root().display(),
        cfg.port
    ));
    logger::log_info("Press Ctrl+C to stop");

    let loop_config = ServerLoopConfig {
        access_log: cfg.logging.access_format(),
        drain_timeout: Duration::from_secs(cfg.shutdown_timeout),
    };
    let shutdown = async move {
        let signal = signals.recv().await;
        logger::log_shutdown_requested(signal);
    };

    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, handler, loop_config, shutdown))
        .await;

    logger::log_info("Server stopped.");
    Ok(())
}
