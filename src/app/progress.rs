use std::io::{IsTerminal, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tokio::sync::oneshot;

const REFRESH_INTERVAL: Duration = Duration::from_millis(250);

/// Highest wave number started so far. Display only; correctness code never
/// reads it.
#[derive(Debug, Default)]
pub struct WaveProgress {
    highest: Mutex<u64>,
}

impl WaveProgress {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Raises the high-water mark. Returns `true` when `wave` was a new high.
    pub fn record(&self, wave: u64) -> bool {
        match self.highest.lock() {
            Ok(mut highest) if *highest < wave => {
                *highest = wave;
                true
            }
            Ok(_) | Err(_) => false,
        }
    }

    #[must_use]
    pub fn highest(&self) -> u64 {
        self.highest.lock().map_or(0, |highest| *highest)
    }
}

/// Keeps a `Sending N request` line up to date on stderr until `done` fires.
/// Does nothing when stderr is not a terminal.
pub(crate) fn spawn_wave_display(
    progress: Arc<WaveProgress>,
    no_color: bool,
    mut done: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if !std::io::stderr().is_terminal() {
            return;
        }

        let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
        let mut shown = 0_u64;
        loop {
            tokio::select! {
                _ = &mut done => {
                    let highest = progress.highest();
                    if highest > shown && render_wave_line(highest, no_color).is_err() {
                        break;
                    }
                    if shown > 0 || highest > 0 {
                        let _flushed = finish_wave_line();
                    }
                    break;
                }
                _ = ticker.tick() => {
                    let highest = progress.highest();
                    if highest > shown {
                        if render_wave_line(highest, no_color).is_err() {
                            break;
                        }
                        shown = highest;
                    }
                }
            }
        }
    })
}

fn render_wave_line(wave: u64, no_color: bool) -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    if no_color {
        queue!(out, Print(format!("Sending {} request", wave)))?;
    } else {
        queue!(
            out,
            Print("Sending "),
            SetForegroundColor(Color::Cyan),
            Print(wave),
            ResetColor,
            Print(" request")
        )?;
    }
    out.flush()
}

fn finish_wave_line() -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    out.write_all(b"\n")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};

    #[test]
    fn record_keeps_the_high_water_mark() -> AppResult<()> {
        let progress = WaveProgress::default();
        if !progress.record(3) {
            return Err(AppError::metrics("Expected 3 to raise the mark"));
        }
        if progress.record(2) {
            return Err(AppError::metrics("Expected 2 to be ignored"));
        }
        if progress.highest() != 3 {
            return Err(AppError::metrics(format!(
                "Unexpected high-water mark {}",
                progress.highest()
            )));
        }
        Ok(())
    }
}
