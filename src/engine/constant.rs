use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::corpus::BulletStore;
use crate::error::{AppError, AppResult, ValidationError};

use super::{BenchResult, EngineConfig, EngineOutcome, Shooter, Transport};

/// Replays the store with `workers` independent tasks.
///
/// With `duration` set, the driver sleeps that long and then raises the stop
/// flag; workers notice it between passes and let the current pass finish.
/// Without it every worker makes exactly one pass.
///
/// # Errors
///
/// Returns an error when the store is empty or a worker task panics or is
/// cancelled.
pub async fn run_constant<TTransport>(
    store: &BulletStore,
    transport: Arc<TTransport>,
    config: &EngineConfig,
    workers: usize,
    duration: Option<Duration>,
) -> AppResult<EngineOutcome>
where
    TTransport: Transport + ?Sized + 'static,
{
    if store.is_empty() {
        return Err(AppError::validation(ValidationError::NoBullets));
    }
    let shooter = Arc::new(Shooter::new(store, transport, config));
    let stop = Arc::new(AtomicBool::new(false));
    let queries = Arc::new(AtomicU64::new(0));
    let single_pass = duration.is_none();

    let started = Instant::now();
    let mut handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        let shooter = Arc::clone(&shooter);
        let stop = Arc::clone(&stop);
        let queries = Arc::clone(&queries);
        handles.push(tokio::spawn(async move {
            let results = replay_until_stopped(&shooter, &stop, &queries, single_pass).await;
            debug!("Worker {} finished with {} results", worker_id, results.len());
            results
        }));
    }

    if let Some(duration) = duration {
        tokio::time::sleep(duration).await;
        stop.store(true, Ordering::Release);
    }

    let mut buffers = Vec::with_capacity(workers);
    for handle in handles {
        buffers.push(handle.await?);
    }

    Ok(EngineOutcome {
        buffers,
        queries: queries.load(Ordering::Acquire),
        elapsed: started.elapsed(),
    })
}

async fn replay_until_stopped<TTransport>(
    shooter: &Shooter<TTransport>,
    stop: &AtomicBool,
    queries: &AtomicU64,
    single_pass: bool,
) -> Vec<BenchResult>
where
    TTransport: Transport + ?Sized,
{
    let mut results = Vec::new();
    let mut scratch = shooter.scratch();
    let mut issued: u64 = 0;

    while !stop.load(Ordering::Acquire) {
        for (index, bullet) in shooter.store().iter().enumerate() {
            results.push(shooter.fire(index, bullet, &mut scratch).await);
            issued = issued.saturating_add(1);
        }
        if single_pass {
            break;
        }
    }

    queries.fetch_add(issued, Ordering::AcqRel);
    results
}
