use super::defaults::{DEFAULT_CORPUS_PATH, DEFAULT_SERVER_ADDR};
use super::*;
use crate::args::parsers::{parse_duration_arg, parse_duration_value};
use crate::error::{AppError, AppResult, ValidationError};
use clap::Parser;
use std::time::Duration;

fn parse_test_args<I, T>(args: I) -> AppResult<CheckArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    CheckArgs::try_parse_from(args).map_err(AppError::from)
}

#[test]
fn parse_args_defaults() -> AppResult<()> {
    let args = parse_test_args(["ammocheck"])?;

    let checks = [
        (args.corpus_path == DEFAULT_CORPUS_PATH, "Unexpected corpus_path"),
        (args.server_addr == DEFAULT_SERVER_ADDR, "Unexpected server_addr"),
        (args.phase == 1, "Unexpected phase"),
        (
            args.bench_time == Duration::from_secs(10),
            "Unexpected bench_time",
        ),
        (args.concurrent.get() == 1, "Unexpected concurrent"),
        (args.tank_rate.is_none(), "Expected tank_rate to be None"),
        (
            args.request_timeout == Duration::from_secs(2),
            "Unexpected request_timeout",
        ),
        (args.filter_req.is_none(), "Expected filter_req to be None"),
        (args.filter_uri.is_none(), "Expected filter_uri to be None"),
        (!args.test_run, "Expected test_run to be false"),
        (!args.hide_failed, "Expected hide_failed to be false"),
        (!args.allow_nulls, "Expected allow_nulls to be false"),
        (!args.utf8, "Expected utf8 to be false"),
        (!args.diff, "Expected diff to be false"),
        (args.config.is_none(), "Expected config to be None"),
        (!args.verbose, "Expected verbose to be false"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(message));
        }
    }
    Ok(())
}

#[test]
fn parse_args_short_flags_and_alias() -> AppResult<()> {
    let args = parse_test_args([
        "ammocheck",
        "--hlcupdocs",
        "/srv/hlcup",
        "-a",
        "http://10.0.0.1:80",
        "-p",
        "3",
        "-t",
        "90s",
        "-c",
        "32",
        "--tank",
        "1000",
        "--timeout",
        "500ms",
    ])?;

    let checks = [
        (args.corpus_path == "/srv/hlcup", "Unexpected corpus_path"),
        (args.server_addr == "http://10.0.0.1:80", "Unexpected server_addr"),
        (args.phase == 3, "Unexpected phase"),
        (
            args.bench_time == Duration::from_secs(90),
            "Unexpected bench_time",
        ),
        (args.concurrent.get() == 32, "Unexpected concurrent"),
        (
            args.tank_rate.map(|rate| rate.get()) == Some(1000),
            "Unexpected tank_rate",
        ),
        (
            args.request_timeout == Duration::from_millis(500),
            "Unexpected request_timeout",
        ),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(message));
        }
    }
    Ok(())
}

#[test]
fn parse_args_boolean_flags() -> AppResult<()> {
    let args = parse_test_args([
        "ammocheck",
        "--test",
        "--hide-failed",
        "--allow-nulls",
        "--utf8",
        "--diff",
        "--no-color",
        "-v",
        "--filter-req",
        "GET:/accounts/filter",
        "--filter-uri",
        "sex_eq",
    ])?;
    if !(args.test_run
        && args.hide_failed
        && args.allow_nulls
        && args.utf8
        && args.diff
        && args.no_color
        && args.verbose)
    {
        return Err(AppError::validation("Expected every flag to be set"));
    }
    if args.filter_req.as_deref() != Some("GET:/accounts/filter")
        || args.filter_uri.as_deref() != Some("sex_eq")
    {
        return Err(AppError::validation("Unexpected filters"));
    }
    Ok(())
}

#[test]
fn parse_args_rejects_zero_counts() -> AppResult<()> {
    for argv in [
        ["ammocheck", "-c", "0"],
        ["ammocheck", "--tank", "0"],
        ["ammocheck", "-t", "0s"],
        ["ammocheck", "--timeout", "0ms"],
    ] {
        if parse_test_args(argv).is_ok() {
            return Err(AppError::validation(format!(
                "Expected {:?} to be rejected",
                argv
            )));
        }
    }
    Ok(())
}

#[test]
fn positive_numbers_parse_trimmed_values() -> AppResult<()> {
    let value: PositiveU64 = " 42 ".parse()?;
    if value.get() != 42 {
        return Err(AppError::validation("Unexpected PositiveU64"));
    }
    match "0".parse::<PositiveUsize>() {
        Err(ValidationError::ValueTooSmall { min: 1 }) => {}
        Err(_) | Ok(_) => return Err(AppError::validation("Expected ValueTooSmall")),
    }
    match "-3".parse::<PositiveUsize>() {
        Err(ValidationError::InvalidNumber { .. }) => Ok(()),
        Err(_) | Ok(_) => Err(AppError::validation("Expected InvalidNumber")),
    }
}

#[test]
fn parse_duration_units() -> AppResult<()> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("15", Duration::from_secs(15)),
        ("15s", Duration::from_secs(15)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
        (" 3s ", Duration::from_secs(3)),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_arg(input)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "Unexpected duration for {}: {:?}",
                input, parsed
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_errors() -> AppResult<()> {
    match parse_duration_value("") {
        Err(ValidationError::DurationEmpty) => {}
        Err(_) | Ok(_) => return Err(AppError::validation("Expected DurationEmpty")),
    }
    match parse_duration_value("ms") {
        Err(ValidationError::InvalidDurationFormat { .. }) => {}
        Err(_) | Ok(_) => return Err(AppError::validation("Expected InvalidDurationFormat")),
    }
    match parse_duration_value("5d") {
        Err(ValidationError::InvalidDurationUnit { unit }) if unit == "d" => {}
        Err(_) | Ok(_) => return Err(AppError::validation("Expected InvalidDurationUnit")),
    }
    match parse_duration_value("0") {
        Err(ValidationError::DurationZero) => {}
        Err(_) | Ok(_) => return Err(AppError::validation("Expected DurationZero")),
    }
    match parse_duration_value(&format!("{}h", u64::MAX)) {
        Err(ValidationError::DurationOverflow) => Ok(()),
        Err(_) | Ok(_) => Err(AppError::validation("Expected DurationOverflow")),
    }
}
