//! Cycle scheduler.
//!
//! Runs a cycle, sleeps a fixed interval, repeats. Each cycle runs in its own
//! task so that an error or a panic is logged and the loop carries on. The
//! sleep is the same whether the cycle completed, halted or failed.

use crate::cycle::{CycleReport, CycleRunner};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

pub struct Scheduler {
    runner: Arc<CycleRunner>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(runner: Arc<CycleRunner>, interval: Duration) -> Self {
        Self { runner, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single cycle to completion. `None` if it failed or panicked.
    pub async fn run_once(&self) -> Option<CycleReport> {
        let runner = Arc::clone(&self.runner);
        match tokio::spawn(async move { runner.run_cycle().await }).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                tracing::error!(error = %format!("{e:#}"), "Cycle failed");
                None
            }
            Err(e) if e.is_panic() => {
                tracing::error!(error = %e, "Cycle panicked");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Cycle task was cancelled");
                None
            }
        }
    }

    /// Run `count` cycles, sleeping between them.
    pub async fn run_cycles(&self, count: usize) -> Vec<Option<CycleReport>> {
        let mut reports = Vec::with_capacity(count);
        for i in 0..count {
            reports.push(self.run_once().await);
            if i + 1 < count {
                sleep(self.interval).await;
            }
        }
        reports
    }

    /// Run forever.
    pub async fn run_forever(&self) {
        self.run_until(std::future::pending::<()>()).await;
    }

    /// Run until `shutdown` resolves. Shutdown is only observed while
    /// sleeping, so a cycle in progress always finishes.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tracing::info!(interval_secs = self.interval.as_secs(), "Scheduler started");
        tokio::pin!(shutdown);

        loop {
            self.run_once().await;

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping scheduler");
                    break;
                }
            }
        }
    }
}

/// Listen for an operator stop request.
///
/// Handlers are registered before this returns, so an interrupt that
/// arrives during the first cycle is held until the scheduler next sleeps
/// instead of killing the process.
#[cfg(unix)]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => tracing::info!("Received SIGINT"),
            _ = terminate.recv() => tracing::info!("Received SIGTERM"),
        }
    })
}

#[cfg(windows)]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
    Ok(async move {
        ctrl_c.recv().await;
        tracing::info!("Received Ctrl-C");
    })
}
