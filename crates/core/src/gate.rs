//! Invocation gate
//!
//! Decides whether an event reaches the control binary. Manual runs always
//! pass, HID binds pass unless debounced, everything else is skipped.

use crate::marker::{Acquire, DebounceMarker};
use crate::trigger::{TriggerKind, TriggerMatch, UdevEvent};
use std::time::Duration;

/// Why the gate turned an event away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// udev event that is not a HID bind
    Unrecognized,
    /// HID bind within the debounce window of the last launch
    Debounced { age: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Proceed. `marked` is set when the gate already stamped the marker.
    Accept { kind: TriggerKind, marked: bool },
    Skip(SkipReason),
}

#[derive(Debug, Clone)]
pub struct Gate {
    trigger: TriggerMatch,
    marker: DebounceMarker,
}

impl Gate {
    pub fn new(trigger: TriggerMatch, marker: DebounceMarker) -> Self {
        Self { trigger, marker }
    }

    pub fn marker(&self) -> &DebounceMarker {
        &self.marker
    }

    pub fn classify(&self, event: &UdevEvent) -> TriggerKind {
        self.trigger.classify(event)
    }

    pub fn decide(&self, event: &UdevEvent) -> GateDecision {
        match self.classify(event) {
            TriggerKind::Manual => GateDecision::Accept {
                kind: TriggerKind::Manual,
                marked: false,
            },
            TriggerKind::Other => GateDecision::Skip(SkipReason::Unrecognized),
            TriggerKind::HidBind => match self.marker.try_acquire() {
                Ok(Acquire::Acquired) => GateDecision::Accept {
                    kind: TriggerKind::HidBind,
                    marked: true,
                },
                Ok(Acquire::Debounced { age }) => {
                    GateDecision::Skip(SkipReason::Debounced { age })
                }
                Err(e) => {
                    // An unusable marker must not block the glasses from being configured
                    tracing::warn!("Debounce check failed, accepting: {}", e);
                    GateDecision::Accept {
                        kind: TriggerKind::HidBind,
                        marked: false,
                    }
                }
            },
        }
    }
}
