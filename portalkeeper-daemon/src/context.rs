//! Daemon lifecycle: cancellation context and handle
//!
//! One keep-alive loop runs per daemon instance. The only shared state is
//! the cancellation signal: `stop()` may be called from any thread, the
//! loop body only ever reads. The sleep between cycles is a cancellable
//! wait, so shutdown latency is bounded by one wait, never by the full
//! check interval.

use crate::controller::SessionController;
use portalkeeper_core::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Shared cancellation state for the keep-alive loop
#[derive(Clone)]
pub struct DaemonContext {
    running: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl DaemonContext {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Check whether the loop should keep running
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Request shutdown and wake any in-progress sleep.
    ///
    /// `notify_one` stores a permit when no sleep is registered yet, so a
    /// stop issued between cycles still cancels the next sleep.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
        self.wake.notify_one();
    }

    /// Sleep for `duration`, returning early when `stop()` is called.
    pub async fn sleep(&self, duration: Duration) {
        if !self.is_running() {
            return;
        }
        tokio::select! {
            _ = self.wake.notified() => {
                debug!("sleep interrupted by stop signal");
            }
            _ = tokio::time::sleep(duration) => {}
        }
    }
}

impl Default for DaemonContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a running keep-alive daemon
pub struct DaemonHandle {
    context: DaemonContext,
    task: Option<JoinHandle<()>>,
}

impl DaemonHandle {
    /// Cancellation context shared with the loop
    pub fn context(&self) -> &DaemonContext {
        &self.context
    }

    /// Request shutdown without waiting
    pub fn stop(&self) {
        self.context.stop();
    }

    /// Wait for the loop task to finish.
    pub async fn wait(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| Error::Interrupted(format!("keep-alive task failed: {e}")))?;
        }
        Ok(())
    }

    /// Request shutdown and wait for the loop to exit.
    pub async fn stop_and_wait(&mut self) -> Result<()> {
        self.stop();
        self.wait().await
    }
}

/// Spawn the keep-alive loop on the runtime and return its handle.
pub fn spawn_keep_alive(controller: Arc<SessionController>) -> DaemonHandle {
    let context = DaemonContext::new();
    let loop_context = context.clone();

    info!("spawning keep-alive daemon");
    let task = tokio::spawn(async move {
        controller.keep_alive(&loop_context).await;
    });

    DaemonHandle {
        context,
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_sleep_runs_to_completion() {
        let ctx = DaemonContext::new();
        let start = Instant::now();
        ctx.sleep(Duration::from_millis(50)).await;
        assert!(start.elapsed() >= Duration::from_millis(45));
        assert!(ctx.is_running());
    }

    #[tokio::test]
    async fn test_stop_interrupts_sleep() {
        let ctx = DaemonContext::new();
        let sleeper = ctx.clone();
        let task = tokio::spawn(async move {
            let start = Instant::now();
            sleeper.sleep(Duration::from_secs(60)).await;
            start.elapsed()
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        ctx.stop();

        let elapsed = task.await.unwrap();
        assert!(elapsed < Duration::from_secs(5));
        assert!(!ctx.is_running());
    }

    #[tokio::test]
    async fn test_stop_before_sleep_skips_wait() {
        let ctx = DaemonContext::new();
        ctx.stop();

        let start = Instant::now();
        ctx.sleep(Duration::from_secs(60)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
