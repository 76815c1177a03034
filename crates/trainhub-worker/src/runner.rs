//! Progression runner: ticks on an interval until shutdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;

use trainhub_core::config::WorkerConfig;
use trainhub_service::{ProgressReport, ScheduleService};

/// Drives [`ScheduleService::advance_due`] on a fixed interval.
#[derive(Debug)]
pub struct ProgressionRunner {
    schedule: Arc<ScheduleService>,
    config: WorkerConfig,
}

impl ProgressionRunner {
    /// Create a new runner.
    pub fn new(schedule: Arc<ScheduleService>, config: WorkerConfig) -> Self {
        Self { schedule, config }
    }

    /// Run until the cancel signal turns `true` or its sender is dropped.
    ///
    /// A tick in flight when shutdown arrives gets `shutdown_grace_seconds`
    /// to finish.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let interval = Duration::from_secs(self.config.tick_interval_seconds.max(1));
        let grace = Duration::from_secs(self.config.shutdown_grace_seconds);
        tracing::info!(
            tick_interval_seconds = interval.as_secs(),
            "Progression worker started"
        );

        loop {
            let tick = self.tick();
            tokio::pin!(tick);

            let interrupted = tokio::select! {
                _ = &mut tick => false,
                _ = shutdown_requested(&mut cancel) => true,
            };
            if interrupted {
                tracing::info!("Progression worker received shutdown signal");
                if time::timeout(grace, &mut tick).await.is_err() {
                    tracing::warn!("In-flight progression tick abandoned after grace period");
                }
                break;
            }

            tokio::select! {
                _ = shutdown_requested(&mut cancel) => {
                    tracing::info!("Progression worker shutting down");
                    break;
                }
                _ = time::sleep(interval) => {}
            }
        }

        tracing::info!("Progression worker stopped");
    }

    /// Run one progression pass now. Failures are logged, not returned.
    pub async fn tick(&self) -> Option<ProgressReport> {
        match self.schedule.advance_due(Utc::now()).await {
            Ok(report) => {
                if report.changed() > 0 || report.conflicts > 0 {
                    tracing::info!(
                        started = report.started,
                        completed = report.completed,
                        conflicts = report.conflicts,
                        "Progression tick applied changes"
                    );
                }
                Some(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "Progression tick failed");
                None
            }
        }
    }
}

async fn shutdown_requested(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            return;
        }
    }
}
