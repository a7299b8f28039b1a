//! Core of the Rokid udev hook
//!
//! This crate provides:
//! - Trigger classification from the udev `DRIVER`/`ACTION` fields
//! - A flock-backed debounce marker
//! - Parameter resolution for the control binary
//! - The append-only invocation log
//! - The `ControlDevice` launcher seam
//! - The invocation state machine tying them together

pub mod control;
pub mod error;
pub mod fsutil;
pub mod gate;
pub mod invocation;
pub mod marker;
pub mod params;
pub mod record;
pub mod trigger;

// Re-exports
pub use control::{ControlDevice, LaunchOutput, ProcessControl};
pub use error::{LaunchError, MarkerError};
pub use gate::{Gate, GateDecision, SkipReason};
pub use invocation::{Invocation, Outcome, Stage};
pub use marker::{Acquire, DebounceMarker, DEFAULT_WINDOW};
pub use params::{default_params, resolve_params, DEFAULT_PARAMS};
pub use record::{environment_snapshot, InvocationLog};
pub use trigger::{TriggerKind, TriggerMatch, UdevEvent};

/// Permission bits applied to the marker and log after each accepted run
pub const SHARED_FILE_MODE: u32 = 0o666;
