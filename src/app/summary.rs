use std::time::Duration;

use crate::engine::{EngineConfig, LoadMode};
use crate::metrics::LatencySummary;
use crate::verify::Verdict;

/// Milliseconds per second.
const MS_PER_SEC: u128 = 1_000;
/// Microseconds per millisecond.
const US_PER_MS: u128 = 1_000;
/// Percent scaled by 100, for two decimals without floats.
const PERCENT_X100: u128 = 10_000;

pub(crate) fn start_line(config: &EngineConfig) -> String {
    match config.mode {
        LoadMode::TestRun => "Start test run".to_owned(),
        LoadMode::Constant {
            concurrency,
            duration,
        } => format!(
            "Start {} benchmark in {} concurrent users",
            format_duration(duration),
            concurrency
        ),
        LoadMode::Tank { rate, duration } => format!(
            "Start {} tank benchmark ramping up to {} rps",
            format_duration(duration),
            rate
        ),
    }
}

pub(crate) fn done_line(queries: u64, elapsed: Duration) -> String {
    let elapsed_ms = elapsed.as_millis();
    format!(
        "Done. {} queries in {} ms => {} rps",
        queries,
        elapsed_ms,
        rounded_rps(queries, elapsed_ms)
    )
}

/// `queries / seconds`, rounded half up.
pub(crate) fn rounded_rps(queries: u64, elapsed_ms: u128) -> u128 {
    let elapsed_ms = elapsed_ms.max(1);
    u128::from(queries)
        .saturating_mul(MS_PER_SEC)
        .saturating_mul(2)
        .saturating_add(elapsed_ms)
        .checked_div(elapsed_ms.saturating_mul(2))
        .unwrap_or(0)
}

pub(crate) fn latency_line(latency: &LatencySummary) -> String {
    format!(
        "Latency avg {} ms, p50 {} ms, p90 {} ms, p99 {} ms, max {} ms",
        format_millis(latency.avg),
        format_millis(latency.p50),
        format_millis(latency.p90),
        format_millis(latency.p99),
        format_millis(latency.max)
    )
}

pub(crate) fn verdict_line(verdict: &Verdict, queries: u64) -> String {
    if verdict.all_ok() {
        return "All answers is OK".to_owned();
    }
    // Rounded half up to two decimals.
    let queries = u128::from(queries);
    let percent_x100 = u128::from(verdict.failed)
        .saturating_mul(PERCENT_X100)
        .saturating_mul(2)
        .saturating_add(queries)
        .checked_div(queries.saturating_mul(2))
        .unwrap_or(0);
    format!(
        "{} requests ({}.{:02}%) failed",
        verdict.failed,
        percent_x100.checked_div(100).unwrap_or(0),
        percent_x100.checked_rem(100).unwrap_or(0)
    )
}

fn format_millis(duration: Duration) -> String {
    let micros = duration.as_micros();
    format!(
        "{}.{:03}",
        micros.checked_div(US_PER_MS).unwrap_or(0),
        micros.checked_rem(US_PER_MS).unwrap_or(0)
    )
}

fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis.checked_rem(MS_PER_SEC) == Some(0) {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};

    #[test]
    fn done_line_rounds_rps() -> AppResult<()> {
        let line = done_line(1500, Duration::from_millis(1000));
        if line != "Done. 1500 queries in 1000 ms => 1500 rps" {
            return Err(AppError::validation(format!("Unexpected line {}", line)));
        }
        if rounded_rps(3, 2000) != 2 || rounded_rps(1, 3000) != 0 {
            return Err(AppError::validation("Expected half-up rounding"));
        }
        if rounded_rps(5, 0) != 5000 {
            return Err(AppError::validation("Expected a zero duration to count as 1 ms"));
        }
        Ok(())
    }

    #[test]
    fn verdict_line_reports_percent_of_queries() -> AppResult<()> {
        let ok = Verdict::default();
        if verdict_line(&ok, 10) != "All answers is OK" {
            return Err(AppError::validation("Expected the OK line"));
        }
        let failed = Verdict {
            checked: 3,
            failed: 1,
            failures: Vec::new(),
        };
        let line = verdict_line(&failed, 3);
        if line != "1 requests (33.33%) failed" {
            return Err(AppError::validation(format!("Unexpected line {}", line)));
        }
        Ok(())
    }

    #[test]
    fn verdict_percent_rounds_half_up() -> AppResult<()> {
        for (failed, queries, expected) in [
            (2, 3, "2 requests (66.67%) failed"),
            (1, 6, "1 requests (16.67%) failed"),
            (1, 8, "1 requests (12.50%) failed"),
            (1, 20_000, "1 requests (0.01%) failed"),
            (1, 30_000, "1 requests (0.00%) failed"),
            (3, 3, "3 requests (100.00%) failed"),
        ] {
            let verdict = Verdict {
                checked: queries,
                failed,
                failures: Vec::new(),
            };
            let line = verdict_line(&verdict, queries);
            if line != expected {
                return Err(AppError::validation(format!(
                    "{}/{}: unexpected line {}",
                    failed, queries, line
                )));
            }
        }
        Ok(())
    }

    #[test]
    fn start_line_names_the_mode() -> AppResult<()> {
        let config = EngineConfig {
            target: "http://127.0.0.1:80".to_owned(),
            mode: LoadMode::Constant {
                concurrency: 4,
                duration: Duration::from_secs(10),
            },
            request_timeout: Duration::from_secs(2),
        };
        let line = start_line(&config);
        if line != "Start 10s benchmark in 4 concurrent users" {
            return Err(AppError::validation(format!("Unexpected line {}", line)));
        }
        Ok(())
    }

    #[test]
    fn latency_line_uses_millisecond_decimals() -> AppResult<()> {
        let latency = LatencySummary {
            count: 1,
            avg: Duration::from_micros(1_250),
            p50: Duration::from_micros(1_000),
            p90: Duration::from_micros(2_005),
            p99: Duration::from_micros(3_000),
            max: Duration::from_micros(4_000),
        };
        let line = latency_line(&latency);
        if line != "Latency avg 1.250 ms, p50 1.000 ms, p90 2.005 ms, p99 3.000 ms, max 4.000 ms" {
            return Err(AppError::validation(format!("Unexpected line {}", line)));
        }
        Ok(())
    }
}
