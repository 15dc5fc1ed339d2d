use std::path::PathBuf;

use regex::bytes::Regex;
use tracing::warn;
use url::Url;

use crate::args::CheckArgs;
use crate::compare::CompareOptions;
use crate::corpus::{CorpusConfig, Phase, RequestFilters};
use crate::engine::{EngineConfig, LoadMode};
use crate::error::{AppError, AppResult, HttpError, ValidationError};
use crate::verify::{ReportStyle, VerifyConfig};

/// Validated settings for one run, built once from the merged CLI/config
/// arguments and passed by reference from then on.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub corpus: CorpusConfig,
    pub engine: EngineConfig,
    pub verify: VerifyConfig,
}

impl RunConfig {
    /// # Errors
    ///
    /// Returns an error when the phase is out of range, a filter is invalid,
    /// or the target address is not an http(s) URL.
    pub fn from_args(args: &CheckArgs) -> AppResult<Self> {
        let phase = Phase::new(args.phase)?;
        let filters = build_filters(args)?;
        let target = normalize_target(&args.server_addr)?;

        Ok(Self {
            corpus: CorpusConfig {
                root: PathBuf::from(&args.corpus_path),
                phase,
                filters,
            },
            engine: EngineConfig {
                target,
                mode: select_mode(args),
                request_timeout: args.request_timeout,
            },
            verify: VerifyConfig {
                compare: CompareOptions {
                    allow_nulls: args.allow_nulls,
                },
                collect_failures: !args.hide_failed,
                style: ReportStyle {
                    utf8: args.utf8,
                    diff: args.diff,
                    color: !args.no_color,
                },
            },
        })
    }
}

fn build_filters(args: &CheckArgs) -> AppResult<RequestFilters> {
    let request_line = match args.filter_req.as_deref() {
        Some(pattern) => Some(Regex::new(pattern).map_err(|err| {
            AppError::validation(ValidationError::InvalidRequestFilter {
                pattern: pattern.to_owned(),
                source: err,
            })
        })?),
        None => None,
    };
    let uri = match args.filter_uri.as_deref() {
        Some("") => return Err(AppError::validation(ValidationError::EmptyUriFilter)),
        Some(filter) => Some(filter.as_bytes().to_vec()),
        None => None,
    };
    Ok(RequestFilters { request_line, uri })
}

/// Bullet URIs start with `/`, so a trailing slash on the address is dropped.
fn normalize_target(addr: &str) -> AppResult<String> {
    let parsed = Url::parse(addr).map_err(|err| {
        AppError::http(HttpError::InvalidUrl {
            url: addr.to_owned(),
            source: err,
        })
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::http(HttpError::UnsupportedScheme {
            url: addr.to_owned(),
        }));
    }
    Ok(addr.trim_end_matches('/').to_owned())
}

fn select_mode(args: &CheckArgs) -> LoadMode {
    if args.test_run {
        if args.tank_rate.is_some() {
            warn!("--tank is ignored in test run mode.");
        }
        return LoadMode::TestRun;
    }
    match args.tank_rate {
        Some(rate) => LoadMode::Tank {
            rate: rate.get(),
            duration: args.bench_time,
        },
        None => LoadMode::Constant {
            concurrency: args.concurrent.get(),
            duration: args.bench_time,
        },
    }
}
