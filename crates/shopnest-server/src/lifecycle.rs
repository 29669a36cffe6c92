//! Process lifecycle
//!
//! Graceful shutdown on SIGINT/SIGTERM, and supervision of background tasks:
//! a background task that dies takes the server down with a non-zero exit
//! instead of leaving it half-alive.

use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use tokio::{sync::Notify, task::JoinHandle};

#[derive(Debug, Default)]
pub struct Shutdown {
    notify: Notify,
    fatal: AtomicBool,
}

impl Shutdown {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Request shutdown because something unrecoverable happened
    pub fn trigger_fatal(&self, reason: &str) {
        tracing::error!(reason, "Fatal error, shutting down");
        self.fatal.store(true, Ordering::SeqCst);
        // notify_one stores a permit if nobody is waiting yet
        self.notify.notify_one();
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal.load(Ordering::SeqCst)
    }

    /// Resolves on the first of: Ctrl+C, SIGTERM, or a fatal trigger
    pub async fn signalled(self: Arc<Self>) {
        tokio::select! {
            _ = ctrl_c() => tracing::info!("🛑 Received Ctrl+C, shutting down"),
            _ = terminate() => tracing::info!("🛑 Received SIGTERM, shutting down"),
            _ = self.notify.notified() => {}
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!("Failed to register SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

/// Watch a background task; if it ever finishes, trigger a fatal shutdown
pub fn supervise(
    shutdown: Arc<Shutdown>,
    name: &'static str,
    task: JoinHandle<()>,
) -> impl Future<Output = ()> {
    async move {
        match task.await {
            Ok(()) => shutdown.trigger_fatal(&format!("background task {name} exited")),
            Err(e) if e.is_panic() => {
                shutdown.trigger_fatal(&format!("background task {name} panicked"))
            }
            Err(e) => shutdown.trigger_fatal(&format!("background task {name} failed: {e}")),
        }
    }
}

/// Log panics through tracing so they land in the same stream as everything else
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());
        tracing::error!(%location, "Panic: {}", info);
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fatal_trigger_resolves_signal() {
        let shutdown = Shutdown::new();
        shutdown.trigger_fatal("test");

        tokio::time::timeout(Duration::from_secs(1), shutdown.clone().signalled())
            .await
            .unwrap();
        assert!(shutdown.is_fatal());
    }

    #[tokio::test]
    async fn test_panicking_task_is_fatal() {
        let shutdown = Shutdown::new();
        let task = tokio::spawn(async { panic!("sweeper crashed") });

        supervise(shutdown.clone(), "sweeper", task).await;

        assert!(shutdown.is_fatal());
    }

    #[tokio::test]
    async fn test_running_task_is_not_fatal() {
        let shutdown = Shutdown::new();
        let task = tokio::spawn(std::future::pending::<()>());

        let watcher = tokio::spawn(supervise(shutdown.clone(), "sweeper", task));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!shutdown.is_fatal());
        watcher.abort();
    }
}
