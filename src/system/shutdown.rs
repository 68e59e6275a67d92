use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

/// Process-wide cancellation signal. Detached background tasks (the
/// soft-delete worker) consult the token before mutating storage; a
/// cancelled token means the task is abandoned and only logged, since
/// its triggering request has already been answered.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> (Self, ShutdownToken) {
        let (tx, rx) = watch::channel(false);
        (Shutdown { tx }, ShutdownToken { rx })
    }

    pub fn trigger(&self) {
        // Receivers may all be gone already during teardown.
        let _ = self.tx.send(true);
    }
}

impl ShutdownToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Flip the shutdown signal when Ctrl+C arrives. The HTTP server does
/// its own graceful stop; this only keeps background tasks from
/// starting work the process will not finish.
pub async fn listen_for_shutdown(shutdown: Shutdown) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    shutdown.trigger();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_starts_uncancelled() {
        let (_shutdown, token) = Shutdown::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_trigger_cancels_all_clones() {
        let (shutdown, token) = Shutdown::new();
        let other = token.clone();

        shutdown.trigger();

        assert!(token.is_cancelled());
        assert!(other.is_cancelled());
    }
}
