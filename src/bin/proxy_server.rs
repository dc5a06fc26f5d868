use std::sync::Arc;
use std::time::Duration;

use devserve::config::ProxyServerConfig;
use devserve::handler::DevProxy;
use devserve::logger;
use devserve::proxy::API_TARGET_HOST;
use devserve::server::{self, ServerLoopConfig, ShutdownSignals};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = ProxyServerConfig::load()?;
    logger::init(&cfg.logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: ProxyServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let signals = ShutdownSignals::register()?;
    let handler = Arc::new(DevProxy::from_config(&cfg)?);

    logger::log_listening(&addr);
    logger::log_info(&format!("Server running at http://localhost:{}/", cfg.port));
    logger::log_info(&format!("Serving static files from: {}/", cfg.static_dir));
    logger::log_info(&format!(
        "API requests will be forwarded to http://{API_TARGET_HOST}:{}/",
        cfg.api_target_port
    ));
    logger::log_info("Press Ctrl+C to stop the server");

    let loop_config = ServerLoopConfig {
        access_log: cfg.logging.access_format(),
        drain_timeout: Duration::from_secs(cfg.shutdown_timeout),
    };
    let shutdown = async move {
        let signal = signals.recv().await;
        logger::log_shutdown_requested(signal);
        logger::log_info("Shutting down server...");
    };

    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, handler, loop_config, shutdown))
        .await;

    Ok(())
}
