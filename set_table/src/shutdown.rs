//! Game-wide termination flag.

use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable handle that asks every actor of a game to stop.
///
/// Stopping is cooperative: the dealer and the players check the flag
/// between steps and wake from any wait as soon as it flips.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// A receiver for one actor
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    /// Request termination. Idempotent, and safe from any thread.
    pub fn terminate(&self) {
        if !self.sender.send_replace(true) {
            log::info!("Termination requested");
        }
    }

    pub fn is_terminated(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves once termination is requested; never resolves if nobody can
/// request it any more.
pub async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
