//! The tailing/tracking loop and its shared snapshot.
//!
//! One [`SessionTracker`] is shared (behind an `Arc`) between the task that
//! follows the log and any number of readers. The loop is the only writer:
//! after each state-changing line it swaps a fresh [`StatusSnapshot`] into a
//! watch channel. Readers never wait on the loop and only ever see the latest
//! snapshot.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use cascade_types::StatusSnapshot;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::context::{AppConfig, AppConfigExt, ParsingSession};
use crate::error::TrackerError;
use crate::handlers::ActivityLog;
use crate::log::{LineSource, PollConfig};

/// Runtime settings for the tracking loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    pub poll: PollConfig,
    pub heartbeat_active: Duration,
    pub heartbeat_idle: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl TrackerConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            poll: config.poll_config(),
            heartbeat_active: config.heartbeat_interval(true),
            heartbeat_idle: config.heartbeat_interval(false),
        }
    }
}

/// Periodic "still reading" log line.
struct Heartbeat {
    active: Duration,
    idle: Duration,
    last: Instant,
}

impl Heartbeat {
    fn new(config: &TrackerConfig) -> Self {
        Self {
            active: config.heartbeat_active,
            idle: config.heartbeat_idle,
            last: Instant::now(),
        }
    }

    fn tick(&mut self, lines: u64, mission_active: bool) {
        let interval = if mission_active { self.active } else { self.idle };
        if self.last.elapsed() > interval {
            let mode = if mission_active { "Fast monitoring" } else { "Monitoring" };
            tracing::info!(lines, mission_active, "{mode}... (processed {lines} lines)");
            self.last = Instant::now();
        }
    }
}

pub struct SessionTracker {
    config: TrackerConfig,
    session: Mutex<ParsingSession>,
    snapshot_tx: watch::Sender<Arc<StatusSnapshot>>,
    stop: AtomicBool,
    running: AtomicBool,
}

impl SessionTracker {
    /// Tracker with the builtin pattern table and activity logging.
    pub fn new(config: TrackerConfig) -> Arc<Self> {
        let mut session = ParsingSession::new();
        session.add_signal_handler(Box::new(ActivityLog::new()));
        Self::with_session(config, session)
    }

    pub fn with_session(config: TrackerConfig, session: ParsingSession) -> Arc<Self> {
        let (snapshot_tx, _) = watch::channel(Arc::new(session.snapshot()));
        Arc::new(Self {
            config,
            session: Mutex::new(session),
            snapshot_tx,
            stop: AtomicBool::new(false),
            running: AtomicBool::new(false),
        })
    }

    /// Latest published state. Never blocks on the tracking loop.
    pub fn snapshot(&self) -> Arc<StatusSnapshot> {
        self.snapshot_tx.borrow().clone()
    }

    /// Receiver that is notified whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<StatusSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Open `path` at its end and spawn the tracking loop.
    ///
    /// A missing or unreadable file is reported here and the loop is not
    /// started; the snapshot keeps its previous value.
    pub async fn start(
        self: &Arc<Self>,
        path: impl Into<PathBuf>,
    ) -> Result<JoinHandle<()>, TrackerError> {
        let path = path.into();
        if self.is_running() {
            return Err(TrackerError::AlreadyRunning);
        }
        // Cleared before claiming the loop so a stop() racing with this
        // start is never lost.
        self.stop.store(false, Ordering::Release);
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(TrackerError::AlreadyRunning);
        }

        let lines = match LineSource::open(&path, self.config.poll).await {
            Ok(lines) => lines,
            Err(source) => {
                self.running.store(false, Ordering::Release);
                return Err(TrackerError::SourceUnavailable { path, source });
            }
        };

        tracing::info!(path = %path.display(), "Watching for new log entries");

        let tracker = Arc::clone(self);
        Ok(tokio::spawn(async move {
            if let Err(e) = tracker.run(lines).await {
                tracing::error!(error = %e, "Tracking loop stopped");
            }
            tracker.running.store(false, Ordering::Release);
        }))
    }

    /// Ask the loop to finish. Safe to call any number of times.
    pub fn stop(&self) {
        if !self.stop.swap(true, Ordering::AcqRel) {
            tracing::debug!("Stop requested");
        }
    }

    async fn run(&self, mut lines: LineSource) -> Result<(), TrackerError> {
        let mut session = self.session.lock().await;
        let mut heartbeat = Heartbeat::new(&self.config);
        lines.set_active(session.is_mission_active());

        loop {
            let line = match lines.next_line(&self.stop).await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(source) => {
                    return Err(TrackerError::Read {
                        path: lines.path().to_path_buf(),
                        source,
                    });
                }
            };

            if session.process_line(&line) {
                self.snapshot_tx.send_replace(Arc::new(session.snapshot()));
            }
            lines.set_active(session.is_mission_active());
            heartbeat.tick(session.line_count(), session.is_mission_active());
        }

        tracing::info!(lines = session.line_count(), "Stopped monitoring log file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_types::{StatusColor, TileTag};
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::path::Path;
    use tokio::time::{sleep, timeout};

    const START: &str = "10.0 Sys [Info]: /Lotus/Levels/Proc/Zariman/ZarimanDirectionalSurvival generating layout with segment seed: 7\n";
    const HANGAR: &str = "10.5 Sys [Info]: Created /Lotus/Levels/Zariman/[IntShuttleBayBackdrop]\n";
    const SHIP: &str = "90.0 Sys [Info]: /Lotus/Levels/Proc/PlayerShip generating layout\n";

    fn append(path: &Path, text: &str) {
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
    }

    async fn wait_for(
        tracker: &SessionTracker,
        pred: impl Fn(&StatusSnapshot) -> bool,
    ) -> Arc<StatusSnapshot> {
        let mut rx = tracker.subscribe();
        timeout(Duration::from_secs(3), async {
            loop {
                let snap = rx.borrow_and_update().clone();
                if pred(&snap) {
                    return snap;
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .expect("snapshot should reach expected state")
    }

    #[tokio::test]
    async fn test_missing_log_is_reported_and_snapshot_kept() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = SessionTracker::new(TrackerConfig::default());

        let err = tracker.start(dir.path().join("EE.log")).await.unwrap_err();
        assert!(matches!(err, TrackerError::SourceUnavailable { .. }));
        assert!(!tracker.is_running());

        let snap = tracker.snapshot();
        assert_eq!(snap.status_text, "Awaiting Cascade...");
        assert_eq!(snap.attempts, 0);
    }

    #[tokio::test]
    async fn test_tracks_appended_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EE.log");
        // Content from before the tracker started must not be replayed
        std::fs::write(&path, START).unwrap();

        let tracker = SessionTracker::new(TrackerConfig::default());
        let handle = tracker.start(&path).await.unwrap();
        assert!(tracker.is_running());

        append(&path, START);
        append(&path, HANGAR);
        let snap = wait_for(&tracker, |s| s.has_tile(TileTag::Hangar)).await;
        assert_eq!(snap.attempts, 1);
        assert_eq!(snap.status_text, "Tile Found: (B) Hangar");
        assert_eq!(snap.status_color, StatusColor::Green);
        assert_eq!(snap.mission_status, "Mission Active");

        append(&path, SHIP);
        let snap = wait_for(&tracker, |s| s.mission_status == "Mission Ended").await;
        assert!(snap.tiles_found.is_empty());
        assert_eq!(snap.status_text, "Awaiting Cascade...");

        tracker.stop();
        timeout(Duration::from_millis(500), handle)
            .await
            .expect("loop should stop within one poll interval")
            .unwrap();
        assert!(!tracker.is_running());
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_and_state_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EE.log");
        std::fs::write(&path, "").unwrap();

        let tracker = SessionTracker::new(TrackerConfig::default());
        let handle = tracker.start(&path).await.unwrap();
        append(&path, START);
        wait_for(&tracker, |s| s.attempts == 1).await;

        tracker.stop();
        tracker.stop();
        timeout(Duration::from_millis(500), handle).await.unwrap().unwrap();

        let handle = tracker.start(&path).await.unwrap();
        append(&path, SHIP);
        let snap = wait_for(&tracker, |s| s.mission_status == "Mission Ended").await;
        assert_eq!(snap.attempts, 1);

        tracker.stop();
        timeout(Duration::from_millis(500), handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_stop_right_after_start_ends_loop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EE.log");
        std::fs::write(&path, "").unwrap();

        let tracker = SessionTracker::new(TrackerConfig::default());
        let handle = tracker.start(&path).await.unwrap();
        tracker.stop();
        timeout(Duration::from_millis(500), handle).await.unwrap().unwrap();
        assert!(!tracker.is_running());
    }

    #[tokio::test]
    async fn test_rejected_start_keeps_pending_stop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EE.log");
        std::fs::write(&path, "").unwrap();

        let tracker = SessionTracker::new(TrackerConfig::default());
        let handle = tracker.start(&path).await.unwrap();
        tracker.stop();
        // A start refused because the loop still runs must not undo the stop
        match tracker.start(&path).await {
            Err(err) => assert!(matches!(err, TrackerError::AlreadyRunning)),
            Ok(second) => {
                // The first loop had already exited; stop the new one too
                tracker.stop();
                timeout(Duration::from_millis(500), second).await.unwrap().unwrap();
            }
        }
        timeout(Duration::from_millis(500), handle).await.unwrap().unwrap();
        assert!(!tracker.is_running());
    }

    #[tokio::test]
    async fn test_second_start_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EE.log");
        std::fs::write(&path, "").unwrap();

        let tracker = SessionTracker::new(TrackerConfig::default());
        let handle = tracker.start(&path).await.unwrap();
        let err = tracker.start(&path).await.unwrap_err();
        assert!(matches!(err, TrackerError::AlreadyRunning));

        tracker.stop();
        timeout(Duration::from_millis(500), handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_unmatched_lines_do_not_publish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EE.log");
        std::fs::write(&path, "").unwrap();

        let tracker = SessionTracker::new(TrackerConfig::default());
        let before = tracker.snapshot();
        let mut rx = tracker.subscribe();
        let handle = tracker.start(&path).await.unwrap();

        append(&path, "1.0 Net [Info]: unrelated\n2.0 Sys [Info]: also unrelated\n");
        sleep(Duration::from_millis(300)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(*tracker.snapshot(), *before);

        tracker.stop();
        timeout(Duration::from_millis(500), handle).await.unwrap().unwrap();
    }
}
