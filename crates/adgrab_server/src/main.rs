mod platform;

use adgrab_server::{build_router, AppState, ServerConfig};
use anyhow::Context;
use engine_logging::engine_info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().context("reading configuration")?;
    platform::logging::initialize(
        platform::logging::LogDestination::from_config(&config),
        config.log_level,
    );
    platform::install_panic_hook();

    let state = AppState::from_config(&config).context("building services")?;
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    engine_info!(
        "adgrab listening on http://{} extract_mode={:?}",
        addr,
        config.extract_mode
    );
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(platform::shutdown_signal())
        .await
        .context("serving http")?;

    engine_info!("adgrab stopped");
    Ok(())
}
