use clap::Parser;
use std::time::Duration;

use super::defaults::{DEFAULT_CORPUS_PATH, DEFAULT_DURATION, DEFAULT_SERVER_ADDR, DEFAULT_TIMEOUT};
use super::parsers::{parse_duration_arg, parse_positive_u64, parse_positive_usize};
use super::types::{PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Replays a recorded request/answer corpus against an HTTP server and verifies every response while under load."
)]
pub struct CheckArgs {
    /// Path to the corpus root (contains ammo/ and answers/)
    #[arg(long = "corpus", alias = "hlcupdocs", default_value = DEFAULT_CORPUS_PATH)]
    pub corpus_path: String,

    /// Target server address; bullet URIs are appended to it
    #[arg(long = "addr", short = 'a', default_value = DEFAULT_SERVER_ADDR)]
    pub server_addr: String,

    /// Phase number (1, 2, 3)
    #[arg(long = "phase", short = 'p', default_value = "1")]
    pub phase: u8,

    /// Benchmark duration (supports ms/s/m/h)
    #[arg(
        long = "time",
        short = 't',
        default_value = DEFAULT_DURATION,
        value_parser = parse_duration_arg
    )]
    pub bench_time: Duration,

    /// Concurrent users in constant-concurrency mode
    #[arg(
        long = "concurrent",
        short = 'c',
        default_value = "1",
        value_parser = parse_positive_usize
    )]
    pub concurrent: PositiveUsize,

    /// Ramp linearly up to this many requests per second over the benchmark duration
    #[arg(long = "tank", value_parser = parse_positive_u64)]
    pub tank_rate: Option<PositiveU64>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = DEFAULT_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Only replay requests whose block header line matches this regex
    #[arg(long = "filter-req")]
    pub filter_req: Option<String>,

    /// Only replay requests whose URI contains this substring
    #[arg(long = "filter-uri")]
    pub filter_uri: Option<String>,

    /// Test run: send every query only once (ignores --time, --concurrent and --tank)
    #[arg(long = "test")]
    pub test_run: bool,

    /// Do not print info about every failed request
    #[arg(long = "hide-failed")]
    pub hide_failed: bool,

    /// Allow null values in response data
    #[arg(long = "allow-nulls")]
    pub allow_nulls: bool,

    /// Show request and response bodies in human-readable UTF-8
    #[arg(long = "utf8")]
    pub utf8: bool,

    /// Show the path of the first mismatch instead of full bodies
    #[arg(long = "diff")]
    pub diff: bool,

    /// Path to config file (TOML/JSON). Defaults to ./ammocheck.toml or ./ammocheck.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by AMMOCHECK_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
