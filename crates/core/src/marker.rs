//! Debounce marker
//!
//! The marker file records when the control binary was last launched. Bind
//! events arriving within the debounce window of that stamp are dropped.
//!
//! Check and stamp happen while holding an exclusive `flock` on the marker,
//! so concurrent hook processes see each other's stamps in order.

use crate::error::MarkerError;
use crate::fsutil::relax_permissions;
use crate::SHARED_FILE_MODE;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default debounce window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5);

/// Result of a debounce attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// Marker stamped, caller may proceed
    Acquired,
    /// A stamp younger than the window exists
    Debounced { age: Duration },
}

/// Marker body
#[derive(Serialize, Deserialize)]
struct MarkerContent {
    pid: u32,
    stamped_at_ms: u64,
}

/// Debounce marker at a fixed path
#[derive(Debug, Clone)]
pub struct DebounceMarker {
    path: PathBuf,
    window: Duration,
}

impl DebounceMarker {
    pub fn new(path: impl Into<PathBuf>, window: Duration) -> Self {
        Self {
            path: path.into(),
            window,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stamp the marker unless it was stamped within the window
    pub fn try_acquire(&self) -> Result<Acquire, MarkerError> {
        self.try_acquire_at(SystemTime::now())
    }

    /// [`try_acquire`](Self::try_acquire) with an explicit clock
    pub fn try_acquire_at(&self, now: SystemTime) -> Result<Acquire, MarkerError> {
        let (mut file, created) = self.open()?;
        self.lock(&file)?;

        if let Some(stamp) = self.read_stamp(&mut file, created) {
            // A stamp from the future counts as fresh
            let age = now.duration_since(stamp).unwrap_or(Duration::ZERO);
            if age < self.window {
                return Ok(Acquire::Debounced { age });
            }
        }

        // flock is released when `file` is closed
        self.write_stamp(&mut file, now)?;
        Ok(Acquire::Acquired)
    }

    /// Stamp the marker unconditionally
    pub fn stamp(&self) -> Result<(), MarkerError> {
        self.stamp_at(SystemTime::now())
    }

    pub fn stamp_at(&self, now: SystemTime) -> Result<(), MarkerError> {
        let (mut file, _) = self.open()?;
        self.lock(&file)?;
        self.write_stamp(&mut file, now)
    }

    /// Age of the current stamp, `None` if there is no marker
    pub fn age_at(&self, now: SystemTime) -> Option<Duration> {
        let mut file = File::open(&self.path).ok()?;
        let stamp = self.read_stamp(&mut file, false)?;
        Some(now.duration_since(stamp).unwrap_or(Duration::ZERO))
    }

    /// Open the marker, reporting whether this call created it
    fn open(&self) -> Result<(File, bool), MarkerError> {
        let open_err = |source: io::Error| MarkerError::Open {
            path: self.path.clone(),
            source,
        };

        match OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => Ok((file, true)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => OpenOptions::new()
                .read(true)
                .write(true)
                .open(&self.path)
                .map(|file| (file, false))
                .map_err(open_err),
            Err(e) => Err(open_err(e)),
        }
    }

    /// Take an exclusive lock, blocking until other holders are done
    #[cfg(unix)]
    fn lock(&self, file: &File) -> Result<(), MarkerError> {
        use nix::fcntl::{flock, FlockArg};
        use std::os::unix::io::AsRawFd;

        loop {
            match flock(file.as_raw_fd(), FlockArg::LockExclusive) {
                Ok(()) => return Ok(()),
                Err(nix::errno::Errno::EINTR) => continue,
                Err(source) => {
                    return Err(MarkerError::Lock {
                        path: self.path.clone(),
                        source,
                    })
                }
            }
        }
    }

    #[cfg(not(unix))]
    fn lock(&self, _file: &File) -> Result<(), MarkerError> {
        Ok(())
    }

    /// Stamp time of the marker.
    ///
    /// Prefers the recorded body. A marker without a readable body (e.g. made
    /// by `touch`) falls back to its mtime, unless this process just created it.
    fn read_stamp(&self, file: &mut File, created: bool) -> Option<SystemTime> {
        if let Some(content) = read_content(file) {
            return Some(UNIX_EPOCH + Duration::from_millis(content.stamped_at_ms));
        }
        if created {
            return None;
        }
        file.metadata().and_then(|m| m.modified()).ok()
    }

    fn write_stamp(&self, file: &mut File, now: SystemTime) -> Result<(), MarkerError> {
        let content = MarkerContent {
            pid: std::process::id(),
            stamped_at_ms: now
                .duration_since(UNIX_EPOCH)
                .unwrap_or(Duration::ZERO)
                .as_millis() as u64,
        };

        write_content(file, &content).map_err(|source| MarkerError::Stamp {
            path: self.path.clone(),
            source,
        })?;

        if let Err(e) = relax_permissions(&self.path, SHARED_FILE_MODE) {
            tracing::warn!("Failed to relax permissions on {}: {}", self.path.display(), e);
        }
        Ok(())
    }
}

fn read_content(file: &mut File) -> Option<MarkerContent> {
    file.seek(SeekFrom::Start(0)).ok()?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

fn write_content(file: &mut File, content: &MarkerContent) -> io::Result<()> {
    let serialized = serde_json::to_string(content)?;

    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(serialized.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
