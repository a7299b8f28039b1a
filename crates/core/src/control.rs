//! Launching the vendor control binary
//!
//! [`ControlDevice`] is the seam between the invocation flow and the glasses.
//! [`ProcessControl`] runs `rokid_max_ctl` with the resolved parameters and
//! appends everything it prints to the invocation log.

use crate::error::LaunchError;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Outcome of a completed launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOutput {
    /// Exit code, `None` if the child was killed by a signal
    pub code: Option<i32>,
}

impl LaunchOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Something that applies display/audio parameters to the glasses
pub trait ControlDevice {
    fn apply(&mut self, params: &[OsString]) -> Result<LaunchOutput, LaunchError>;
}

/// Control binary run as a child process
#[derive(Debug, Clone)]
pub struct ProcessControl {
    binary: PathBuf,
    output: PathBuf,
}

impl ProcessControl {
    /// `output` receives the child's stdout and stderr, appended. A bare
    /// `binary` name is looked up on `PATH`.
    pub fn new(binary: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            output: output.into(),
        }
    }
}

impl ControlDevice for ProcessControl {
    fn apply(&mut self, params: &[OsString]) -> Result<LaunchOutput, LaunchError> {
        let sink_err = |source: io::Error| LaunchError::Sink {
            path: self.output.clone(),
            source,
        };
        let stdout = crate::fsutil::open_append(&self.output).map_err(sink_err)?;
        let stderr = stdout.try_clone().map_err(sink_err)?;

        tracing::debug!("Launching {} {:?}", self.binary.display(), params);

        // No timeout: the hook blocks until the control binary exits
        let mut child = Command::new(&self.binary)
            .args(params)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => LaunchError::NotFound(self.binary.clone()),
                _ => LaunchError::Spawn {
                    path: self.binary.clone(),
                    source,
                },
            })?;

        let status = child.wait().map_err(|source| LaunchError::Wait {
            path: self.binary.clone(),
            source,
        })?;

        Ok(LaunchOutput {
            code: status.code(),
        })
    }
}
