use lib_common::core::CancellationToken;
use tokio::signal;

/// Cancels `token` on Ctrl-C or, on unix, SIGTERM. A listener that fails to
/// install never fires, leaving the other one in charge.
pub async fn watch_signals(token: CancellationToken) {
    tokio::select! {
        _ = interrupt() => {
            log::info!("Ctrl-C received, stopping after the current tick.");
        }
        _ = terminate() => {
            log::info!("SIGTERM received, stopping after the current tick.");
        }
    }
    token.cancel();
}

async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        log::error!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut term_signal) => {
            term_signal.recv().await;
        }
        Err(e) => {
            log::warn!("Unable to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    // On non-unix platforms, just wait forever.
    std::future::pending::<()>().await;
}
