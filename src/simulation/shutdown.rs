//! # OS signal handling for a simulation run.
//!
//! **Unix:** `SIGINT`, `SIGTERM`, `SIGQUIT` and Ctrl-C.
//! **Other platforms:** Ctrl-C via [`tokio::signal::ctrl_c`].
//!
//! A signal closes the admission window early; gates already in flight
//! still finish and the run produces a report.

use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};

/// Waits for a termination signal.
///
/// Returns `Err` if signal registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Spawns a watcher that cancels `token` on the first signal.
///
/// The watcher exits quietly once `token` is cancelled for another reason
/// or signal registration fails.
pub(crate) fn watch_signals(bus: Bus, token: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            res = wait_for_shutdown_signal() => {
                if res.is_ok() {
                    bus.publish(Event::new(EventKind::ShutdownRequested));
                    token.cancel();
                }
            }
            _ = token.cancelled() => {}
        }
    });
}
