// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Graceful shutdown coordination.
//!
//! OS signals (SIGTERM, SIGINT) or a manual trigger flip a single flag and
//! wake every subscriber. The HTTP server takes [`ShutdownCoordinator::signal`]
//! as its graceful-shutdown future.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

// =============================================================================
// ShutdownCoordinator
// =============================================================================

/// Coordinates graceful shutdown.
///
/// ```ignore
/// use clinic_bin::shutdown::ShutdownCoordinator;
///
/// let coordinator = ShutdownCoordinator::new();
/// tokio::spawn({
///     let coordinator = coordinator.clone();
///     async move { coordinator.listen_for_signals().await }
/// });
/// server.run_with_shutdown(coordinator.signal()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownCoordinator {
    /// Creates a new shutdown coordinator.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Initiates shutdown. Only the first call has an effect.
    pub fn initiate_shutdown(&self) {
        let first = self.sender.send_if_modified(|initiated| {
            if *initiated {
                false
            } else {
                *initiated = true;
                true
            }
        });
        if first {
            info!("Shutdown initiated");
        }
    }

    /// Returns true if shutdown has been initiated.
    pub fn is_shutdown_initiated(&self) -> bool {
        *self.sender.borrow()
    }

    /// A future that resolves once shutdown has been initiated.
    ///
    /// Resolves immediately if it already was.
    pub fn signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut receiver = self.sender.subscribe();
        async move {
            // The sender lives as long as any coordinator clone; an error means
            // every clone is gone and nothing can trigger shutdown anymore.
            let _ = receiver.wait_for(|initiated| *initiated).await;
        }
    }

    /// Waits for an OS signal, then initiates shutdown.
    pub async fn listen_for_signals(&self) {
        tokio::select! {
            name = wait_for_os_signal() => {
                info!(signal = name, "Received shutdown signal");
            }
            _ = self.signal() => return,
        }
        self.initiate_shutdown();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn wait_for_os_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Failed to register signal handlers");
            return std::future::pending().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    }
}

#[cfg(not(unix))]
async fn wait_for_os_signal() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to register Ctrl+C handler");
        return std::future::pending().await;
    }
    "Ctrl+C"
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_manual_shutdown_wakes_signal() {
        let coordinator = ShutdownCoordinator::new();
        let signal = coordinator.signal();
        assert!(!coordinator.is_shutdown_initiated());

        coordinator.initiate_shutdown();
        tokio::time::timeout(Duration::from_secs(1), signal)
            .await
            .expect("signal should resolve");
        assert!(coordinator.is_shutdown_initiated());
    }

    #[tokio::test]
    async fn test_signal_after_shutdown_resolves_immediately() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.initiate_shutdown();
        coordinator.initiate_shutdown();

        tokio::time::timeout(Duration::from_millis(100), coordinator.signal())
            .await
            .expect("signal should resolve");
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let coordinator = ShutdownCoordinator::new();
        let clone = coordinator.clone();
        let signal = coordinator.signal();

        clone.initiate_shutdown();
        tokio::time::timeout(Duration::from_secs(1), signal)
            .await
            .expect("signal should resolve");
    }

    #[tokio::test]
    async fn test_listen_returns_on_manual_shutdown() {
        let coordinator = ShutdownCoordinator::new();
        let listener = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.listen_for_signals().await }
        });

        coordinator.initiate_shutdown();
        tokio::time::timeout(Duration::from_secs(1), listener)
            .await
            .expect("listener should stop")
            .unwrap();
    }
}
