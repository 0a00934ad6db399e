//! Process-level wiring for the adgrab binary: logging, panic guard, shutdown.
pub mod logging;

use engine_logging::{engine_error, engine_info, engine_warn};

/// Route unexpected panics through the log before the default hook aborts the task.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        engine_error!("unexpected fault: {}", info);
        log::logger().flush();
        default_hook(info);
    }));
}

/// Resolves on Ctrl-C so in-flight requests can drain.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => engine_info!("shutdown requested"),
        Err(err) => {
            engine_warn!("could not listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
