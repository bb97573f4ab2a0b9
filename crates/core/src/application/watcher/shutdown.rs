// Stop signal for the daemon's background loops

use tokio::sync::watch;

/// Held by a background loop; resolves once the daemon stops
#[derive(Clone)]
pub struct ShutdownToken {
    stopped: watch::Receiver<bool>,
}

impl ShutdownToken {
    pub fn is_shutdown(&self) -> bool {
        *self.stopped.borrow()
    }

    /// Resolves when shutdown is signalled or the sender is gone
    pub async fn wait(&mut self) {
        // Err means the sender was dropped: nobody can keep us running
        let _ = self.stopped.wait_for(|stopped| *stopped).await;
    }
}

/// Owned by the composition root
pub struct ShutdownSender {
    stopped: watch::Sender<bool>,
}

impl ShutdownSender {
    pub fn shutdown(&self) {
        self.stopped.send_replace(true);
    }

    /// Another token for an extra background loop
    pub fn token(&self) -> ShutdownToken {
        ShutdownToken {
            stopped: self.stopped.subscribe(),
        }
    }
}

pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (stopped, rx) = watch::channel(false);
    (ShutdownSender { stopped }, ShutdownToken { stopped: rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_after_signal_returns() {
        let (tx, mut token) = shutdown_channel();
        tx.shutdown();
        token.wait().await;
        assert!(token.is_shutdown());
    }

    #[tokio::test]
    async fn test_late_token_sees_signal() {
        let (tx, _token) = shutdown_channel();
        tx.shutdown();
        assert!(tx.token().is_shutdown());
    }

    #[tokio::test]
    async fn test_dropped_sender_releases_waiters() {
        let (tx, mut token) = shutdown_channel();
        drop(tx);
        token.wait().await;
        assert!(!token.is_shutdown());
    }
}
