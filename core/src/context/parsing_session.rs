use cascade_types::StatusSnapshot;

use crate::signal_processor::{EventProcessor, MissionSignal, SignalHandler};
use crate::state::SessionCache;

/// Single-threaded owner of session state.
///
/// Lines go in through [`process_line`](Self::process_line); signals are
/// dispatched to registered handlers; readers get copies via
/// [`snapshot`](Self::snapshot).
#[derive(Default)]
pub struct ParsingSession {
    pub session_cache: SessionCache,
    processor: EventProcessor,
    signal_handlers: Vec<Box<dyn SignalHandler + Send + Sync>>,
    line_count: u64,
}

impl ParsingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a signal handler to receive mission signals
    pub fn add_signal_handler(&mut self, handler: Box<dyn SignalHandler + Send + Sync>) {
        self.signal_handlers.push(handler);
    }

    /// Process a single line and dispatch its signals.
    ///
    /// Returns true if the line changed session state.
    pub fn process_line(&mut self, line: &str) -> bool {
        self.line_count += 1;
        let before = self.session_cache.revision();
        let signals = self
            .processor
            .process_line(self.line_count, line, &mut self.session_cache);
        self.dispatch_signals(&signals);
        self.session_cache.revision() != before
    }

    /// Process multiple lines; returns true if any of them changed state.
    pub fn process_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) -> bool {
        let mut changed = false;
        for line in lines {
            changed |= self.process_line(line);
        }
        changed
    }

    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    pub fn is_mission_active(&self) -> bool {
        self.session_cache.is_mission_active()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.session_cache.to_snapshot()
    }

    fn dispatch_signals(&mut self, signals: &[MissionSignal]) {
        if signals.is_empty() {
            return;
        }
        for handler in &mut self.signal_handlers {
            handler.handle_signals(signals);
        }
    }
}
