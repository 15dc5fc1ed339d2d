//! Verification of recorded outcomes against the expected answers.
mod report;


use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::compare::{CompareOptions, bodies_equal};
use crate::corpus::{Bullet, BulletStore};
use crate::engine::BenchResult;
use crate::error::AppResult;

pub use report::{ReportStyle, print_failures, render_failure, unescape_for_display};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyConfig {
    pub compare: CompareOptions,
    /// Keep a [`Failure`] record per failed result for diagnostics.
    pub collect_failures: bool,
    pub style: ReportStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Status differs, transport failures included.
    Status,
    /// Status 200 on both sides but the bodies are not equal.
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub bullet_index: usize,
    pub got_status: i32,
    pub expected_status: i32,
    pub got_body: Vec<u8>,
    pub kind: FailureKind,
}

#[derive(Debug, Clone, Default)]
pub struct Verdict {
    pub checked: u64,
    pub failed: u64,
    pub failures: Vec<Failure>,
}

impl Verdict {
    #[must_use]
    pub const fn all_ok(&self) -> bool {
        self.failed == 0
    }
}

/// Decides whether one result satisfies its bullet.
#[must_use]
pub fn check_result(
    bullet: &Bullet,
    result: &BenchResult,
    options: CompareOptions,
) -> Option<FailureKind> {
    if result.status != bullet.response.status {
        return Some(FailureKind::Status);
    }
    if bullet.response.status == 200
        && !bodies_equal(&bullet.response.body, &result.body, options)
    {
        return Some(FailureKind::Body);
    }
    None
}

/// Scans every outcome buffer on its own blocking task and tallies failures.
///
/// # Errors
///
/// Returns an error when a scan task panics.
pub async fn evaluate(
    store: &BulletStore,
    buffers: Vec<Vec<BenchResult>>,
    config: &VerifyConfig,
) -> AppResult<Verdict> {
    let checked = Arc::new(AtomicU64::new(0));
    let failed = Arc::new(AtomicU64::new(0));

    let mut handles = Vec::with_capacity(buffers.len());
    for buffer in buffers {
        let store = store.clone();
        let checked = Arc::clone(&checked);
        let failed = Arc::clone(&failed);
        let config = *config;
        handles.push(tokio::task::spawn_blocking(move || {
            scan_buffer(&store, buffer, &config, &checked, &failed)
        }));
    }

    let mut failures = Vec::new();
    for handle in handles {
        failures.extend(handle.await?);
    }

    Ok(Verdict {
        checked: checked.load(Ordering::Acquire),
        failed: failed.load(Ordering::Acquire),
        failures,
    })
}

fn scan_buffer(
    store: &BulletStore,
    buffer: Vec<BenchResult>,
    config: &VerifyConfig,
    checked: &AtomicU64,
    failed: &AtomicU64,
) -> Vec<Failure> {
    let mut local_failed: u64 = 0;
    let mut failures = Vec::new();
    let total = u64::try_from(buffer.len()).unwrap_or(u64::MAX);

    for result in buffer {
        let Some(bullet) = store.get(result.bullet_index) else {
            warn!("Result for unknown bullet {}", result.bullet_index);
            local_failed = local_failed.saturating_add(1);
            continue;
        };
        let Some(kind) = check_result(bullet, &result, config.compare) else {
            continue;
        };
        local_failed = local_failed.saturating_add(1);
        if config.collect_failures {
            failures.push(Failure {
                bullet_index: result.bullet_index,
                got_status: result.status,
                expected_status: bullet.response.status,
                got_body: result.body,
                kind,
            });
        }
    }

    checked.fetch_add(total, Ordering::AcqRel);
    if local_failed > 0 {
        failed.fetch_add(local_failed, Ordering::AcqRel);
    }
    failures
}
