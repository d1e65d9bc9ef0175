use std::time::Duration;
use tokio::sync::mpsc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::checker::PriceChecker;
use crate::models::CycleFailurePolicy;
use crate::utils::error::AppError;
use crate::Result;

fn scheduler_error<E: std::fmt::Debug>(err: E) -> AppError {
    AppError::Scheduler(format!("{:?}", err))
}

/// Drives a [`PriceChecker`]: one cycle straight away, then one per firing of
/// a repeating timer. Cycles never overlap; a firing that arrives while a
/// cycle is still running is folded into the next one.
pub struct CheckScheduler {
    checker: PriceChecker,
    interval: Duration,
    on_cycle_error: CycleFailurePolicy,
}

impl CheckScheduler {
    pub fn new(checker: PriceChecker, interval: Duration, on_cycle_error: CycleFailurePolicy) -> Self {
        Self {
            checker,
            interval,
            on_cycle_error,
        }
    }

    /// Runs until a cycle fails under [`CycleFailurePolicy::Exit`]. Otherwise
    /// never returns.
    pub async fn run(&self) -> Result<()> {
        let (tx, rx) = mpsc::channel(1);
        let mut scheduler = self.start_timer(tx).await?;

        let result = self.run_with_ticks(rx).await;

        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!("Error shutting down timer: {:?}", e);
        }
        result
    }

    async fn start_timer(&self, tx: mpsc::Sender<()>) -> Result<JobScheduler> {
        let scheduler = JobScheduler::new().await.map_err(scheduler_error)?;

        let job = Job::new_repeated_async(self.interval, move |_uuid, _l| {
            let tx = tx.clone();
            Box::pin(async move {
                if tx.try_send(()).is_err() {
                    tracing::debug!("Previous check still pending, coalescing timer firing");
                }
            })
        })
        .map_err(scheduler_error)?;

        scheduler.add(job).await.map_err(scheduler_error)?;
        scheduler.start().await.map_err(scheduler_error)?;
        Ok(scheduler)
    }

    /// Runs the immediate cycle, then one cycle per message on `ticks` until
    /// the channel closes.
    pub async fn run_with_ticks(&self, mut ticks: mpsc::Receiver<()>) -> Result<()> {
        tracing::info!("Initial check...");
        self.run_cycle().await?;

        tracing::info!(
            "Scheduler started - checking every {} hours",
            self.interval.as_secs_f64() / 3600.0
        );

        while ticks.recv().await.is_some() {
            self.run_cycle().await?;
        }

        tracing::debug!("Tick source closed, scheduler stopping");
        Ok(())
    }

    async fn run_cycle(&self) -> Result<()> {
        match self.checker.check().await {
            Ok(report) => {
                tracing::debug!(
                    "Cycle started at {} checked {} items ({} skipped), {} matches",
                    report.started_at,
                    report.items_checked,
                    report.items_skipped,
                    report.matches_found
                );
                Ok(())
            }
            Err(e) => match self.on_cycle_error {
                CycleFailurePolicy::Exit => {
                    tracing::error!("Check cycle failed: {}", e);
                    Err(e)
                }
                CycleFailurePolicy::Continue => {
                    tracing::warn!("Check cycle failed, waiting for next run: {}", e);
                    Ok(())
                }
            },
        }
    }
}
