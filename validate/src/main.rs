//! cascade-validate - replays a captured EE.log through the tile detector.
//!
//! Usage: cascade-validate --file <EE.log> [--quiet]
//!
//! Every line is fed through the same processor the live scanner uses, from
//! the first byte. Signals are printed with their line numbers, followed by
//! the final status snapshot as JSON.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use cascade_core::log::decode_line;
use cascade_core::{MissionSignal, ParsingSession, SignalHandler, StatusSnapshot};
use clap::Parser;
use memchr::memchr_iter;
use memmap2::Mmap;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cascade-validate")]
#[command(about = "Replay an EE.log and report detected cascade signals")]
struct Args {
    /// Path to the log file to replay
    #[arg(short, long)]
    file: PathBuf,

    /// Only print the final snapshot
    #[arg(short, long)]
    quiet: bool,
}

/// Result of replaying one file.
struct Replay {
    lines: u64,
    signals: Vec<MissionSignal>,
    snapshot: StatusSnapshot,
}

/// Keeps every signal the session dispatches.
#[derive(Clone, Default)]
struct SignalRecorder(Arc<Mutex<Vec<MissionSignal>>>);

impl SignalRecorder {
    fn take(&self) -> Vec<MissionSignal> {
        let mut signals = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *signals)
    }
}

impl SignalHandler for SignalRecorder {
    fn handle_signal(&mut self, signal: &MissionSignal) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(signal.clone());
    }
}

fn replay_file(path: &Path) -> Result<Replay, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let len = file.metadata().map_err(|e| e.to_string())?.len();

    let recorder = SignalRecorder::default();
    let mut session = ParsingSession::new();
    session.add_signal_handler(Box::new(recorder.clone()));

    if len > 0 {
        // SAFETY: the file is opened read-only and only read for the life of the map
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| e.to_string())?;
        let bytes = mmap.as_ref();

        let mut start = 0;
        for end in memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len())) {
            if end <= start && end == bytes.len() {
                break;
            }
            session.process_line(&decode_line(&bytes[start..end]));
            start = end + 1;
        }
    }

    Ok(Replay {
        lines: session.line_count(),
        signals: recorder.take(),
        snapshot: session.snapshot(),
    })
}

fn describe(signal: &MissionSignal) -> String {
    match signal {
        MissionSignal::MissionStarted { attempt, .. } => {
            format!("mission started (attempt {attempt})")
        }
        MissionSignal::MissionEnded { attempt, .. } => format!("mission ended (attempt {attempt})"),
        MissionSignal::TileDetected { tile, .. } => format!("tile detected: {tile}"),
        MissionSignal::TilesReset { .. } => "tiles reset".to_string(),
        MissionSignal::NoTilesFound { .. } => "no tiles found".to_string(),
    }
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let replay = replay_file(&args.file)?;

    if !args.quiet {
        for signal in &replay.signals {
            println!("{:>8}  {}", signal.line_number(), describe(signal));
        }
        println!(
            "-- {} lines, {} signals --",
            replay.lines,
            replay.signals.len()
        );
    }

    let json = serde_json::to_string_pretty(&replay.snapshot).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::TileTag;
    use std::io::Write;

    fn replay_text(text: &[u8]) -> Replay {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text).unwrap();
        replay_file(file.path()).unwrap()
    }

    #[test]
    fn test_replay_full_mission() {
        let replay = replay_text(
            b"1.0 Sys [Info]: /Lotus/Levels/Proc/Zariman/ZarimanDirectionalSurvival generating layout\r\n\
              2.0 Sys [Info]: [IntLunaroCourtBackdrop]\n\
              3.0 Sys [Info]: noise \xff\xfe\n\
              4.0 Sys [Info]: [IntShuttleBayBackdrop]",
        );

        assert_eq!(replay.lines, 4);
        let lines: Vec<u64> = replay.signals.iter().map(|s| s.line_number()).collect();
        assert_eq!(lines, vec![1, 2, 4]);
        assert_eq!(replay.snapshot.attempts, 1);
        assert_eq!(replay.snapshot.tiles_found, vec![TileTag::Hangar, TileTag::Lunaro]);
        assert_eq!(replay.snapshot.status_text, "Tiles Found: (B) Hangar + Lunaro");
    }

    #[test]
    fn test_replay_records_mission_end_once() {
        let replay = replay_text(
            b"1.0 Sys [Info]: /Lotus/Levels/Proc/Zariman/ZarimanDirectionalSurvival generating layout\n\
              2.0 Sys [Info]: /Lotus/Levels/Proc/PlayerShip generating layout\n\
              3.0 Sys [Info]: /Lotus/Levels/Proc/PlayerShip generating layout\n",
        );

        let described: Vec<String> = replay.signals.iter().map(describe).collect();
        assert_eq!(
            described,
            vec!["mission started (attempt 1)", "mission ended (attempt 1)"]
        );
        assert_eq!(replay.snapshot.mission_status, "Mission Ended");
    }

    #[test]
    fn test_replay_empty_file() {
        let replay = replay_text(b"");
        assert_eq!(replay.lines, 0);
        assert!(replay.signals.is_empty());
        assert_eq!(replay.snapshot.status_text, "Awaiting Cascade...");
    }

    #[test]
    fn test_trailing_newline_is_not_an_extra_line() {
        let replay = replay_text(b"a\nb\n");
        assert_eq!(replay.lines, 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(replay_file(&dir.path().join("EE.log")).is_err());
    }

    #[test]
    fn test_describe_signals() {
        let signal = MissionSignal::TileDetected {
            tile: TileTag::Park,
            line_number: 7,
            timestamp: chrono::NaiveDateTime::default(),
        };
        assert_eq!(describe(&signal), "tile detected: Park");
    }
}
