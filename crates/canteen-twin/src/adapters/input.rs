//! Simulated Input Subsystem
//!
//! Stands in for the board's GPIO layer. Lines are configured and callbacks
//! registered exactly as on hardware; `inject` then plays the part of an
//! electrical edge by invoking the registered callback synchronously.

use crate::domain::clock::ManualClock;
use crate::domain::dispatcher::LineId;
use crate::domain::input::{EdgeCallback, EdgeKind, InputSubsystem};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Default)]
struct Line {
    edge: Option<EdgeKind>,
    callback: Option<EdgeCallback>,
    injected: u64,
}

/// Programmable edge source. Clones share the same lines.
#[derive(Clone, Default)]
pub struct SimulatedInput {
    lines: Arc<Mutex<BTreeMap<LineId, Line>>>,
}

impl SimulatedInput {
    /// Create an input with no configured lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise one edge on `line`.
    ///
    /// Returns `false` if no callback is registered for the line. The
    /// callback runs outside the internal lock, like a real interrupt.
    pub fn inject(&self, line: LineId) -> bool {
        let callback = {
            let mut lines = self.lines.lock();
            let entry = lines.entry(line).or_default();
            entry.injected += 1;
            entry.callback.clone()
        };
        let Some(callback) = callback else {
            return false;
        };
        callback(line);
        true
    }

    /// Raise one edge per entry of `gaps_ms`, advancing `clock` by the gap
    /// before each edge. Returns the number of edges delivered.
    pub fn inject_burst(&self, line: LineId, clock: &ManualClock, gaps_ms: &[u64]) -> usize {
        let mut delivered = 0;
        for &gap in gaps_ms {
            clock.advance(gap);
            if self.inject(line) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Lines configured so far, in ascending order.
    pub fn configured_lines(&self) -> Vec<LineId> {
        self.lines
            .lock()
            .iter()
            .filter(|(_, l)| l.edge.is_some())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Edge polarity `line` was configured with.
    pub fn edge_kind(&self, line: LineId) -> Option<EdgeKind> {
        self.lines.lock().get(&line).and_then(|l| l.edge)
    }

    /// Edges injected on `line`, delivered or not.
    pub fn injected(&self, line: LineId) -> u64 {
        self.lines.lock().get(&line).map_or(0, |l| l.injected)
    }
}

impl InputSubsystem for SimulatedInput {
    fn configure_line(&mut self, line: LineId, edge: EdgeKind) {
        self.lines.lock().entry(line).or_default().edge = Some(edge);
    }

    fn register_edge_callback(&mut self, line: LineId, callback: EdgeCallback) {
        self.lines.lock().entry(line).or_default().callback = Some(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::MonotonicClock;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_inject_without_callback() {
        let input = SimulatedInput::new();
        assert!(!input.inject(LineId::ENTRANCE));
        assert_eq!(input.injected(LineId::ENTRANCE), 1);
        assert!(input.configured_lines().is_empty());
    }

    #[test]
    fn test_inject_invokes_callback() {
        let mut input = SimulatedInput::new();
        let hits = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&hits);

        input.configure_line(LineId::EXIT, EdgeKind::Falling);
        input.register_edge_callback(
            LineId::EXIT,
            Arc::new(move |line: LineId| {
                assert_eq!(line, LineId::EXIT);
                seen.fetch_add(1, Ordering::Relaxed);
            }),
        );

        assert!(input.inject(LineId::EXIT));
        assert!(input.clone().inject(LineId::EXIT));
        assert_eq!(hits.load(Ordering::Relaxed), 2);
        assert_eq!(input.configured_lines(), vec![LineId::EXIT]);
        assert_eq!(input.edge_kind(LineId::EXIT), Some(EdgeKind::Falling));
    }

    #[test]
    fn test_burst_advances_clock() {
        let mut input = SimulatedInput::new();
        input.register_edge_callback(LineId::RESET, Arc::new(|_: LineId| {}));
        let clock = ManualClock::new();

        let delivered = input.inject_burst(LineId::RESET, &clock, &[0, 20, 40]);
        assert_eq!(delivered, 3);
        assert_eq!(clock.now_ms(), 60);
    }
}
