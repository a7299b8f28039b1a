//! Process exit codes

use hook_core::{Outcome, SkipReason};

/// Launched, or skipped as an unrelated udev event
pub const EXIT_OK: u8 = 0;
/// Bind event dropped by the debounce window
pub const EXIT_DEBOUNCED: u8 = 1;
/// Control binary could not be run
pub const EXIT_LAUNCH_FAILED: u8 = 2;
/// Configuration unreadable or invalid
pub const EXIT_CONFIG: u8 = 3;

/// Map a finished run to the hook's exit code.
///
/// With `propagate`, a failing control binary's own code is returned.
pub fn exit_code(outcome: &Outcome, propagate: bool) -> u8 {
    match outcome {
        Outcome::Skipped(SkipReason::Unrecognized) => EXIT_OK,
        Outcome::Skipped(SkipReason::Debounced { .. }) => EXIT_DEBOUNCED,
        Outcome::LaunchFailed { .. } => EXIT_LAUNCH_FAILED,
        Outcome::Launched { output, .. } if propagate && !output.success() => match output.code {
            Some(code) => (code & 0xff) as u8,
            None => EXIT_LAUNCH_FAILED,
        },
        Outcome::Launched { .. } => EXIT_OK,
    }
}
