use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{CheckArgs, PositiveU64, PositiveUsize};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments that were not given on the
/// command line.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(
    args: &mut CheckArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "corpus_path")
        && let Some(corpus) = config.corpus.clone()
    {
        args.corpus_path = corpus;
    }

    if !is_cli(matches, "server_addr")
        && let Some(addr) = config.addr.clone()
    {
        args.server_addr = addr;
    }

    if !is_cli(matches, "phase")
        && let Some(phase) = config.phase
    {
        args.phase = phase;
    }

    if !is_cli(matches, "bench_time")
        && let Some(time) = config.time.as_ref()
    {
        args.bench_time = ensure_duration(time, "time")?;
    }

    if !is_cli(matches, "concurrent")
        && let Some(concurrent) = config.concurrent
    {
        args.concurrent = ensure_positive_usize(concurrent, "concurrent")?;
    }

    if !is_cli(matches, "tank_rate")
        && let Some(rate) = config.tank
    {
        args.tank_rate = Some(ensure_positive_u64(rate, "tank")?);
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = ensure_duration(timeout, "timeout")?;
    }

    if !is_cli(matches, "filter_req")
        && let Some(filter) = config.filter_req.clone()
    {
        args.filter_req = Some(filter);
    }

    if !is_cli(matches, "filter_uri")
        && let Some(filter) = config.filter_uri.clone()
    {
        args.filter_uri = Some(filter);
    }

    apply_flag(matches, "test_run", config.test, &mut args.test_run);
    apply_flag(matches, "hide_failed", config.hide_failed, &mut args.hide_failed);
    apply_flag(matches, "allow_nulls", config.allow_nulls, &mut args.allow_nulls);
    apply_flag(matches, "utf8", config.utf8, &mut args.utf8);
    apply_flag(matches, "diff", config.diff, &mut args.diff);
    apply_flag(matches, "no_color", config.no_color, &mut args.no_color);

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn apply_flag(matches: &ArgMatches, name: &str, value: Option<bool>, target: &mut bool) {
    if !is_cli(matches, name)
        && let Some(value) = value
    {
        *target = value;
    }
}

fn ensure_duration(value: &DurationValue, field: &str) -> AppResult<std::time::Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidDuration {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}
