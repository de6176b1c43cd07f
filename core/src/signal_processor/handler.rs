use super::MissionSignal;

/// Receives signals emitted while processing log lines.
pub trait SignalHandler {
    fn handle_signal(&mut self, signal: &MissionSignal);

    fn handle_signals(&mut self, signals: &[MissionSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }
}
