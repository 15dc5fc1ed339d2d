use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::info;

use crate::config::RunConfig;
use crate::corpus::BulletStore;
use crate::engine::{self, LoadMode, ReqwestTransport, Transport};
use crate::error::{AppError, AppResult, ValidationError};
use crate::metrics::{LatencySummary, summarize_latencies};
use crate::verify::{self, Verdict};

use super::progress::{WaveProgress, spawn_wave_display};
use super::summary;

/// What one run produced, after the report has been printed.
#[derive(Debug)]
pub struct CheckReport {
    pub bullets: usize,
    pub queries: u64,
    pub elapsed: Duration,
    pub latency: LatencySummary,
    pub verdict: Verdict,
}

/// Loads the corpus, drives the load and verifies every answer.
///
/// # Errors
///
/// Returns an error when the corpus cannot be loaded or is empty after
/// filtering, the HTTP client cannot be built, or a task fails.
pub async fn run_check(config: &RunConfig) -> AppResult<CheckReport> {
    let store = BulletStore::load(&config.corpus).await?;
    println!("bullets count: {}", store.len());
    if store.is_empty() {
        return Err(AppError::validation(ValidationError::NoBullets));
    }
    let transport = Arc::new(ReqwestTransport::new(&config.engine)?);
    run_with_transport(&store, transport, config).await
}

/// Runs the load and the verification over an already loaded store.
///
/// # Errors
///
/// Returns an error when a worker or verification task fails, or the report
/// cannot be written.
pub async fn run_with_transport<TTransport>(
    store: &BulletStore,
    transport: Arc<TTransport>,
    config: &RunConfig,
) -> AppResult<CheckReport>
where
    TTransport: Transport + ?Sized + 'static,
{
    println!("{}", summary::start_line(&config.engine));
    info!("Target {}", config.engine.target);

    let progress = WaveProgress::new();
    let (done_tx, done_rx) = oneshot::channel();
    let display = matches!(config.engine.mode, LoadMode::Tank { .. }).then(|| {
        spawn_wave_display(Arc::clone(&progress), !config.verify.style.color, done_rx)
    });

    let outcome = engine::run(store, transport, &config.engine, &progress).await;
    let _display_stopped = done_tx.send(());
    if let Some(display) = display {
        display.await?;
    }
    let outcome = outcome?;

    let latency = summarize_latencies(outcome.results())?;
    println!("{}", summary::done_line(outcome.queries, outcome.elapsed));
    println!("{}", summary::latency_line(&latency));

    println!("Check the answers...");
    let queries = outcome.queries;
    let elapsed = outcome.elapsed;
    let verdict = verify::evaluate(store, outcome.buffers, &config.verify).await?;
    if config.verify.collect_failures {
        verify::print_failures(
            store,
            &verdict.failures,
            config.verify.style,
            config.verify.compare,
        )?;
    }
    println!("{}", summary::verdict_line(&verdict, queries));

    Ok(CheckReport {
        bullets: store.len(),
        queries,
        elapsed,
        latency,
        verdict,
    })
}
