//! Error types for the hook core

use std::path::PathBuf;
use thiserror::Error;

/// Failures while checking or stamping the debounce marker
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("failed to open marker {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to lock marker {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },

    #[error("failed to stamp marker {path}: {source}")]
    Stamp {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while running the control binary
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("control binary not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to open output sink {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {path}: {source}")]
    Wait {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
