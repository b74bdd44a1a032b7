//! Recording Drivers
//!
//! Fakes for the two output collaborators. Each is a cheap cloneable handle
//! onto a shared log, so a test keeps one clone while the surface owns the
//! other.
//!
//! `RecordingDisplay` also checks frame integrity: a `clear` that arrives
//! before the previous frame's `commit`, or a draw outside a frame, is
//! counted as a torn write.

use crate::domain::pool::IndicatorLevel;
use crate::domain::surface::{DisplayDriver, IndicatorDriver};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// One call made on the display driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    /// `clear()`
    Clear,
    /// `draw_frame()`
    Frame,
    /// `draw_text(text, x, y)`
    Text {
        /// Rendered text
        text: String,
        /// Column
        x: u8,
        /// Row
        y: u8,
    },
    /// `commit()`
    Commit,
}

#[derive(Debug, Default)]
struct DisplayLog {
    calls: Vec<DisplayCall>,
    in_frame: bool,
    torn: u64,
    commits: u64,
    staged: Vec<String>,
    committed: Vec<String>,
}

/// Display fake that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    log: Arc<Mutex<DisplayLog>>,
    commit_latency: Duration,
}

impl RecordingDisplay {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `commit` take `latency`, like a slow bus transfer.
    pub fn with_commit_latency(latency: Duration) -> Self {
        Self {
            log: Arc::default(),
            commit_latency: latency,
        }
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<DisplayCall> {
        self.log.lock().calls.clone()
    }

    /// Text lines of the last committed frame.
    pub fn committed_lines(&self) -> Vec<String> {
        self.log.lock().committed.clone()
    }

    /// Number of committed frames.
    pub fn commits(&self) -> u64 {
        self.log.lock().commits
    }

    /// Number of integrity violations observed.
    pub fn torn_writes(&self) -> u64 {
        self.log.lock().torn
    }

    /// Forget recorded calls, keeping counters.
    pub fn clear_calls(&self) {
        self.log.lock().calls.clear();
    }
}

impl DisplayDriver for RecordingDisplay {
    fn clear(&mut self) {
        let mut log = self.log.lock();
        if log.in_frame {
            log.torn += 1;
        }
        log.in_frame = true;
        log.staged.clear();
        log.calls.push(DisplayCall::Clear);
    }

    fn draw_frame(&mut self) {
        let mut log = self.log.lock();
        if !log.in_frame {
            log.torn += 1;
        }
        log.calls.push(DisplayCall::Frame);
    }

    fn draw_text(&mut self, text: &str, x: u8, y: u8) {
        let mut log = self.log.lock();
        if !log.in_frame {
            log.torn += 1;
        }
        log.staged.push(text.to_owned());
        log.calls.push(DisplayCall::Text {
            text: text.to_owned(),
            x,
            y,
        });
    }

    fn commit(&mut self) {
        if !self.commit_latency.is_zero() {
            std::thread::sleep(self.commit_latency);
        }
        let mut log = self.log.lock();
        if !log.in_frame {
            log.torn += 1;
        }
        log.in_frame = false;
        log.commits += 1;
        log.committed = std::mem::take(&mut log.staged);
        log.calls.push(DisplayCall::Commit);
    }
}

/// Indicator fake that records every level shown.
#[derive(Debug, Clone, Default)]
pub struct RecordingIndicator {
    levels: Arc<Mutex<Vec<IndicatorLevel>>>,
}

impl RecordingIndicator {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every level shown so far.
    pub fn levels(&self) -> Vec<IndicatorLevel> {
        self.levels.lock().clone()
    }

    /// Level currently shown.
    pub fn last(&self) -> Option<IndicatorLevel> {
        self.levels.lock().last().copied()
    }
}

impl IndicatorDriver for RecordingIndicator {
    fn set_level(&mut self, level: IndicatorLevel) {
        self.levels.lock().push(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_frame_is_not_torn() {
        let mut display = RecordingDisplay::new();
        display.clear();
        display.draw_frame();
        display.draw_text("Total: 8", 5, 25);
        display.commit();

        assert_eq!(display.torn_writes(), 0);
        assert_eq!(display.commits(), 1);
        assert_eq!(display.committed_lines(), vec!["Total: 8".to_string()]);
    }

    #[test]
    fn test_interleaved_clear_is_torn() {
        let mut display = RecordingDisplay::new();
        display.clear();
        display.draw_text("Total: 8", 5, 25);
        display.clear();
        display.commit();
        display.draw_text("stray", 0, 0);

        assert_eq!(display.torn_writes(), 2);
    }

    #[test]
    fn test_indicator_records_levels() {
        let indicator = RecordingIndicator::new();
        let mut driver = indicator.clone();
        driver.set_level(IndicatorLevel::Full);
        driver.set_level(IndicatorLevel::Low);

        assert_eq!(indicator.levels(), vec![IndicatorLevel::Full, IndicatorLevel::Low]);
        assert_eq!(indicator.last(), Some(IndicatorLevel::Low));
    }
}
