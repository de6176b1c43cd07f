//! Follow a log file the way `tail -f` does.
//!
//! A [`LineSource`] starts at the current end of the file, so nothing written
//! before it was opened is replayed. Bytes are accumulated until a newline
//! arrives; only complete lines are handed out. When the file has no new data
//! the source sleeps for the active or idle poll interval and tries again.
//!
//! At every end-of-data the path is checked again: if it now names a
//! different file (rotation) or the file is shorter than the read offset
//! (truncation), the source reopens it and reads from the start.

use std::collections::VecDeque;
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use memchr::memchr_iter;
use same_file::Handle;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::time::sleep;

use super::decode::decode_line;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Longest partial line kept while waiting for its newline.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Poll intervals used while waiting for the file to grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Interval while a mission is running (low detection latency)
    pub active: Duration,
    /// Interval otherwise (low CPU use)
    pub idle: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            active: Duration::from_millis(10),
            idle: Duration::from_millis(100),
        }
    }
}

/// Open `path` for reading along with a handle identifying the file itself.
async fn open_with_identity(path: &Path) -> io::Result<(File, Handle)> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&path)?;
        let identity = Handle::from_file(file.try_clone()?)?;
        Ok::<_, io::Error>((File::from_std(file), identity))
    })
    .await
    .map_err(io::Error::other)?
}

/// Incremental line reader over a growing file.
#[derive(Debug)]
pub struct LineSource {
    path: PathBuf,
    file: File,
    /// Identity of the open file, compared against whatever the path names now
    identity: Handle,
    /// Byte offset of the next read
    position: u64,
    /// Read-but-unterminated bytes
    buffer: Vec<u8>,
    /// Set while skipping the rest of an over-long line
    discarding: bool,
    /// Complete lines not yet handed out
    pending: VecDeque<String>,
    chunk: Box<[u8]>,
    poll: PollConfig,
    active: bool,
    lines_read: u64,
}

impl LineSource {
    /// Open `path` and position at its current end.
    pub async fn open(path: impl AsRef<Path>, poll: PollConfig) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (mut file, identity) = open_with_identity(&path).await?;
        let position = file.seek(SeekFrom::End(0)).await?;

        tracing::debug!(path = %path.display(), position, "Following log file from end");

        Ok(Self {
            path,
            file,
            identity,
            position,
            buffer: Vec::new(),
            discarding: false,
            pending: VecDeque::new(),
            chunk: vec![0u8; READ_CHUNK_SIZE].into_boxed_slice(),
            poll,
            active: false,
            lines_read: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset the next read will start at.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Number of complete lines handed out so far.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Switch between fast (active) and slow (idle) polling.
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            tracing::debug!(active, "Poll mode changed");
        }
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sleep duration used when no new data is available.
    pub fn poll_interval(&self) -> Duration {
        if self.active {
            self.poll.active
        } else {
            self.poll.idle
        }
    }

    /// Wait for the next complete line.
    ///
    /// Returns `Ok(None)` once `stop` is raised. The flag is checked before
    /// every read and after every sleep, so a raised flag is observed within
    /// one poll interval.
    pub async fn next_line(&mut self, stop: &AtomicBool) -> io::Result<Option<String>> {
        loop {
            if stop.load(Ordering::Acquire) {
                return Ok(None);
            }

            if let Some(line) = self.pending.pop_front() {
                self.lines_read += 1;
                return Ok(Some(line));
            }

            let n = self.file.read(&mut self.chunk).await?;
            if n == 0 {
                self.reopen_if_replaced().await;
                sleep(self.poll_interval()).await;
                continue;
            }

            self.position += n as u64;
            let scanned = self.buffer.len();
            self.buffer.extend_from_slice(&self.chunk[..n]);
            self.drain_complete_lines(scanned);
        }
    }

    /// Move every complete line out of the buffer. Bytes before `scanned`
    /// are already known to hold no newline.
    fn drain_complete_lines(&mut self, scanned: usize) {
        let mut start = 0;
        for end in memchr_iter(b'\n', &self.buffer[scanned..]).map(|i| i + scanned) {
            if self.discarding || end - start > MAX_LINE_BYTES {
                self.discarding = false;
            } else {
                self.pending
                    .push_back(decode_line(&self.buffer[start..end]).into_owned());
            }
            start = end + 1;
        }
        self.buffer.drain(..start);

        if self.buffer.len() > MAX_LINE_BYTES {
            tracing::warn!(
                path = %self.path.display(),
                bytes = self.buffer.len(),
                "Skipping over-long log line"
            );
            self.buffer.clear();
            self.discarding = true;
        }
    }

    /// Reopen the path when it names a different file than the one being
    /// read, or when the file is now shorter than the read offset.
    async fn reopen_if_replaced(&mut self) {
        let path = self.path.clone();
        let current = tokio::task::spawn_blocking(move || {
            let handle = Handle::from_path(&path)?;
            let len = handle.as_file().metadata()?.len();
            Ok::<_, io::Error>((handle, len))
        })
        .await;
        let (current, len) = match current {
            Ok(Ok(found)) => found,
            // Rotated away and not recreated yet; keep waiting on the old handle.
            _ => return,
        };

        let rotated = current != self.identity;
        if !rotated && len >= self.position {
            return;
        }

        match open_with_identity(&self.path).await {
            Ok((file, identity)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    old_position = self.position,
                    new_len = len,
                    rotated,
                    "Log file truncated or rotated, following from start"
                );
                self.file = file;
                self.identity = identity;
                self.position = 0;
                self.buffer.clear();
                self.discarding = false;
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to reopen rotated log file"
                );
            }
        }
    }
}
