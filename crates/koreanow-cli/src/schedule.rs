//! Recurring ingestion on a cron schedule.
//!
//! Overlapping ticks inside this process are skipped. Nothing stops a second
//! process (or a manual `fetch`) from writing the same feed file concurrently.

use std::path::Path;
use std::sync::Arc;

use koreanow_core::AppConfig;
use koreanow_scraper::IngestPipeline;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::ingest::build_pipeline;

/// Outcome of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tick {
    Completed,
    Failed,
    Skipped,
}

/// Runs the pipeline unless a previous run still holds `running`.
pub(crate) async fn run_guarded(pipeline: &IngestPipeline, running: &Mutex<()>) -> Tick {
    let Ok(_guard) = running.try_lock() else {
        tracing::warn!("scheduler: previous ingestion run still in progress; skipping tick");
        return Tick::Skipped;
    };

    tracing::info!("scheduler: starting ingestion run");
    match pipeline.run().await {
        Ok(document) => {
            tracing::info!(total = document.total, "scheduler: ingestion run complete");
            Tick::Completed
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: ingestion run failed");
            Tick::Failed
        }
    }
}

/// Registers the ingestion job and blocks until ctrl-c / SIGTERM.
///
/// # Errors
///
/// Fails when the pipeline cannot be built, `cron` is not a valid
/// expression, or the scheduler cannot start or stop.
pub(crate) async fn run_schedule(
    config: &AppConfig,
    cron: &str,
    output: Option<&Path>,
    run_now: bool,
) -> anyhow::Result<()> {
    let pipeline = Arc::new(build_pipeline(config, output)?);
    let running = Arc::new(Mutex::new(()));

    let mut scheduler = JobScheduler::new().await?;
    let job = {
        let pipeline = Arc::clone(&pipeline);
        let running = Arc::clone(&running);
        Job::new_async(cron, move |_uuid, _lock| {
            let pipeline = Arc::clone(&pipeline);
            let running = Arc::clone(&running);
            Box::pin(async move {
                run_guarded(&pipeline, &running).await;
            })
        })?
    };
    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(
        cron,
        path = %pipeline.store().path().display(),
        "ingestion scheduler started"
    );

    if run_now {
        run_guarded(&pipeline, &running).await;
    }

    shutdown_signal().await;
    scheduler.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping scheduler");
}
