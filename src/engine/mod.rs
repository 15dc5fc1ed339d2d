//! Load generation against the target server.
//!
//! Two strategies share one request path ([`Shooter::fire`]):
//! constant concurrency replays the whole store in a loop per worker until
//! the stop flag is raised, tank mode schedules single-request waves on a
//! per-second staircase. Every worker or wave owns the buffer it fills and
//! hands it back through its join handle.
mod constant;
mod pool;
mod result;
mod tank;
mod transport;


use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::app::progress::WaveProgress;
use crate::corpus::{Bullet, BulletStore};
use crate::error::AppResult;

pub use constant::run_constant;
pub use pool::{PooledScratch, Scratch, ScratchPool};
pub use result::{BenchResult, TRANSPORT_FAILURE_STATUS};
pub use tank::{MAX_TANK_WAVES, TankPlan, TankStep, run_tank};
pub use transport::{OutgoingRequest, ReqwestTransport, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Fixed number of workers looping over the store until time is up.
    Constant {
        concurrency: usize,
        duration: Duration,
    },
    /// One worker, one pass over the store.
    TestRun,
    /// Linear ramp up to `rate` requests per second over `duration`.
    Tank { rate: u64, duration: Duration },
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Address prefix every bullet URI is appended to.
    pub target: String,
    pub mode: LoadMode,
    pub request_timeout: Duration,
}

/// Everything the engine hands back once all workers have finished.
#[derive(Debug)]
pub struct EngineOutcome {
    pub buffers: Vec<Vec<BenchResult>>,
    pub queries: u64,
    pub elapsed: Duration,
}

impl EngineOutcome {
    pub fn results(&self) -> impl Iterator<Item = &BenchResult> {
        self.buffers.iter().flatten()
    }
}

/// Runs the strategy selected by `config.mode`.
///
/// # Errors
///
/// Returns an error when a worker task panics or is cancelled, or when the
/// tank ramp would exceed [`MAX_TANK_WAVES`].
pub async fn run<TTransport>(
    store: &BulletStore,
    transport: Arc<TTransport>,
    config: &EngineConfig,
    progress: &Arc<WaveProgress>,
) -> AppResult<EngineOutcome>
where
    TTransport: Transport + ?Sized + 'static,
{
    match config.mode {
        LoadMode::Constant {
            concurrency,
            duration,
        } => run_constant(store, transport, config, concurrency, Some(duration)).await,
        LoadMode::TestRun => run_constant(store, transport, config, 1, None).await,
        LoadMode::Tank { rate, duration } => {
            let plan = TankPlan::bounded(rate, whole_seconds(duration))?;
            run_tank(store, transport, config, &plan, duration, progress).await
        }
    }
}

/// The ramp works in whole seconds; sub-second runs get a single step.
fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs().max(1)
}

/// Request issuance shared by both strategies.
pub(crate) struct Shooter<TTransport: ?Sized> {
    store: BulletStore,
    transport: Arc<TTransport>,
    pool: Arc<ScratchPool>,
    target: Arc<[u8]>,
    timeout: Duration,
}

impl<TTransport> Shooter<TTransport>
where
    TTransport: Transport + ?Sized,
{
    pub(crate) fn new(
        store: &BulletStore,
        transport: Arc<TTransport>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            store: store.clone(),
            transport,
            pool: ScratchPool::new(),
            target: Arc::from(config.target.as_bytes()),
            timeout: config.request_timeout,
        }
    }

    pub(crate) const fn store(&self) -> &BulletStore {
        &self.store
    }

    pub(crate) fn scratch(&self) -> PooledScratch {
        self.pool.acquire()
    }

    /// Sends one bullet and records the outcome. Transport errors become
    /// [`TRANSPORT_FAILURE_STATUS`] with an empty body.
    pub(crate) async fn fire(
        &self,
        bullet_index: usize,
        bullet: &Bullet,
        scratch: &mut Scratch,
    ) -> BenchResult {
        scratch.uri.clear();
        scratch.uri.extend_from_slice(&self.target);
        scratch.uri.extend_from_slice(&bullet.request.uri);
        scratch.body.clear();

        let request = OutgoingRequest::new(&bullet.request, &scratch.uri);
        let started = Instant::now();
        let outcome = self
            .transport
            .send(&request, self.timeout, &mut scratch.body)
            .await;
        let duration = started.elapsed();

        match outcome {
            Ok(status) => BenchResult {
                bullet_index,
                status: i32::from(status),
                body: scratch.body.clone(),
                duration,
            },
            Err(err) => {
                debug!(
                    "{} {} failed: {}",
                    request.method(),
                    String::from_utf8_lossy(request.uri),
                    err
                );
                BenchResult {
                    bullet_index,
                    status: TRANSPORT_FAILURE_STATUS,
                    body: Vec::new(),
                    duration,
                }
            }
        }
    }
}
