use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::app::progress::WaveProgress;
use crate::corpus::BulletStore;
use crate::error::{AppError, AppResult, ValidationError};

use super::{BenchResult, EngineConfig, EngineOutcome, Shooter, Transport};

/// Upper bound on the waves one tank run may schedule. Every wave keeps its
/// result until the run is evaluated.
pub const MAX_TANK_WAVES: u64 = 10_000_000;

/// Waves started together at one second boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TankStep {
    pub offset: Duration,
    pub waves: u64,
}

/// Staircase approximation of a linear ramp from 0 to `rate` requests per
/// second over `duration_secs` seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TankPlan {
    steps: Vec<TankStep>,
}

impl TankPlan {
    /// Second `s` gets `floor(s * rate / duration_secs) + 1` waves, for every
    /// `s` whose planned rate is still below `rate`.
    #[must_use]
    pub fn new(rate: u64, duration_secs: u64) -> Self {
        if rate == 0 {
            return Self { steps: Vec::new() };
        }
        let steps = (0..duration_secs)
            .map(|second| {
                let planned = u128::from(second)
                    .saturating_mul(u128::from(rate))
                    .checked_div(u128::from(duration_secs))
                    .unwrap_or(0);
                TankStep {
                    offset: Duration::from_secs(second),
                    waves: u64::try_from(planned)
                        .unwrap_or(u64::MAX)
                        .saturating_add(1),
                }
            })
            .collect();
        Self { steps }
    }

    /// Like [`TankPlan::new`], but refuses ramps that could exceed
    /// [`MAX_TANK_WAVES`] before any step is allocated.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TankPlanTooLarge`] with the upper bound
    /// `duration_secs + rate * (duration_secs - 1) / 2` of the wave count.
    pub fn bounded(rate: u64, duration_secs: u64) -> Result<Self, ValidationError> {
        let ramp = u128::from(rate)
            .saturating_mul(u128::from(duration_secs.saturating_sub(1)))
            .checked_div(2)
            .unwrap_or(0);
        let waves = if rate == 0 {
            0
        } else {
            ramp.saturating_add(u128::from(duration_secs))
        };
        if waves > u128::from(MAX_TANK_WAVES) {
            return Err(ValidationError::TankPlanTooLarge {
                waves: u64::try_from(waves).unwrap_or(u64::MAX),
                max: MAX_TANK_WAVES,
            });
        }
        Ok(Self::new(rate, duration_secs))
    }

    #[must_use]
    pub fn steps(&self) -> &[TankStep] {
        &self.steps
    }

    #[must_use]
    pub fn total_waves(&self) -> u64 {
        self.steps
            .iter()
            .fold(0_u64, |total, step| total.saturating_add(step.waves))
    }

    /// Waves in the last step, i.e. the rate reached at the top of the ramp.
    #[must_use]
    pub fn peak_rate(&self) -> u64 {
        self.steps.last().map_or(0, |step| step.waves)
    }
}

/// Walks the steps of `plan`, spawning each step's waves at its offset. Each
/// wave claims the next bullet index (wrapping around the store), sends that
/// one request and ends. The driver then waits out `duration` and joins all
/// waves.
///
/// # Errors
///
/// Returns an error when the store is empty, the plan exceeds
/// [`MAX_TANK_WAVES`], or a wave task panics or is cancelled.
pub async fn run_tank<TTransport>(
    store: &BulletStore,
    transport: Arc<TTransport>,
    config: &EngineConfig,
    plan: &TankPlan,
    duration: Duration,
    progress: &Arc<WaveProgress>,
) -> AppResult<EngineOutcome>
where
    TTransport: Transport + ?Sized + 'static,
{
    if store.is_empty() {
        return Err(AppError::validation(ValidationError::NoBullets));
    }
    let total_waves = plan.total_waves();
    if total_waves > MAX_TANK_WAVES {
        return Err(AppError::validation(ValidationError::TankPlanTooLarge {
            waves: total_waves,
            max: MAX_TANK_WAVES,
        }));
    }
    let shooter = Arc::new(Shooter::new(store, transport, config));
    let next_bullet = Arc::new(AtomicUsize::new(0));
    let queries = Arc::new(AtomicU64::new(0));
    let bullet_count = store.len();

    info!(
        "Tank plan: {} steps, {} waves, peak {} rps",
        plan.steps().len(),
        total_waves,
        plan.peak_rate()
    );

    let started = Instant::now();
    let mut handles = Vec::new();
    for step in plan.steps() {
        tokio::time::sleep(step.offset.saturating_sub(started.elapsed())).await;
        debug!("Tank step at {:?}: {} waves", step.offset, step.waves);
        for _ in 0..step.waves {
            let shooter = Arc::clone(&shooter);
            let next_bullet = Arc::clone(&next_bullet);
            let queries = Arc::clone(&queries);
            let progress = Arc::clone(progress);
            handles.push(tokio::spawn(async move {
                let claimed = next_bullet.fetch_add(1, Ordering::AcqRel);
                progress.record(u64::try_from(claimed).unwrap_or(u64::MAX).saturating_add(1));
                let index = claimed.checked_rem(bullet_count).unwrap_or(0);
                let Some(bullet) = shooter.store().get(index) else {
                    return Vec::new();
                };
                let mut scratch = shooter.scratch();
                let result: BenchResult = shooter.fire(index, bullet, &mut scratch).await;
                queries.fetch_add(1, Ordering::AcqRel);
                vec![result]
            }));
        }
    }

    tokio::time::sleep(duration.saturating_sub(started.elapsed())).await;

    let mut buffers = Vec::with_capacity(handles.len());
    for handle in handles {
        buffers.push(handle.await?);
    }
    debug!("Joined {} waves", buffers.len());

    Ok(EngineOutcome {
        buffers,
        queries: queries.load(Ordering::Acquire),
        elapsed: started.elapsed(),
    })
}
