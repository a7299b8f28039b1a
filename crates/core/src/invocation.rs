//! One run of the hook, as an explicit state machine
//!
//! ```text
//! Start -> Logged -> GateAccept -> Marked -> Launched -> Permissioned -> End
//!                 \-> GateReject -> End
//! ```

use crate::control::{ControlDevice, LaunchOutput};
use crate::error::LaunchError;
use crate::gate::{Gate, GateDecision, SkipReason};
use crate::params::resolve_params;
use crate::record::{environment_snapshot, InvocationLog};
use crate::trigger::{TriggerKind, UdevEvent};
use crate::SHARED_FILE_MODE;
use std::collections::BTreeMap;
use std::ffi::OsString;

/// Named states of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Logged,
    GateAccept,
    GateReject,
    Marked,
    Launched,
    Permissioned,
    End,
}

impl Stage {
    /// Whether `next` is a legal successor of `self`
    pub fn can_advance_to(self, next: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, next),
            (Start, Logged)
                | (Logged, GateAccept)
                | (Logged, GateReject)
                | (GateAccept, Marked)
                | (Marked, Launched)
                | (Launched, Permissioned)
                | (Permissioned, End)
                | (GateReject, End)
        )
    }
}

/// How a run finished
#[derive(Debug)]
pub enum Outcome {
    /// The control binary ran to completion
    Launched {
        kind: TriggerKind,
        output: LaunchOutput,
    },
    /// The control binary could not be run
    LaunchFailed {
        kind: TriggerKind,
        error: LaunchError,
    },
    Skipped(SkipReason),
}

/// A single hook invocation
pub struct Invocation<C: ControlDevice> {
    event: UdevEvent,
    args: Vec<OsString>,
    defaults: Vec<OsString>,
    environment: Option<BTreeMap<String, String>>,
    gate: Gate,
    log: InvocationLog,
    control: C,
    stages: Vec<Stage>,
}

impl<C: ControlDevice> Invocation<C> {
    pub fn new(
        event: UdevEvent,
        args: Vec<OsString>,
        defaults: Vec<OsString>,
        gate: Gate,
        log: InvocationLog,
        control: C,
    ) -> Self {
        Self {
            event,
            args,
            defaults,
            environment: None,
            gate,
            log,
            control,
            stages: vec![Stage::Start],
        }
    }

    /// Environment to dump on manual runs, instead of the process environment
    pub fn with_environment(mut self, environment: BTreeMap<String, String>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// States visited so far
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    pub fn stage(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Start)
    }

    pub fn run(&mut self) -> Outcome {
        self.best_effort(|log, event| log.append_arrival(&chrono::Local::now(), event));
        self.advance(Stage::Logged);

        let (kind, marked) = match self.gate.decide(&self.event) {
            GateDecision::Accept { kind, marked } => (kind, marked),
            GateDecision::Skip(reason) => return self.reject(reason),
        };
        self.advance(Stage::GateAccept);

        if kind == TriggerKind::Manual {
            let environment = self.environment.take().unwrap_or_else(environment_snapshot);
            self.best_effort(|log, _| log.append_environment(&environment, &self.args));
        }

        if !marked {
            if let Err(e) = self.gate.marker().stamp() {
                tracing::warn!("Failed to stamp marker: {}", e);
            }
        }
        self.advance(Stage::Marked);

        let params = resolve_params(&self.args, &self.defaults);
        let result = self.control.apply(&params);
        self.advance(Stage::Launched);

        match &result {
            Ok(output) if !output.success() => {
                let status = output
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                tracing::warn!("Control binary exited unsuccessfully ({})", status);
                self.best_effort(|log, _| log.append_line(&format!("exit status: {}", status)));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("{}", e);
                self.best_effort(|log, _| log.append_line(&format!("launch failed: {}", e)));
            }
        }

        if let Err(e) = self.log.relax_permissions(SHARED_FILE_MODE) {
            tracing::warn!("Failed to relax permissions on {}: {}", self.log.path().display(), e);
        }
        self.advance(Stage::Permissioned);
        self.advance(Stage::End);

        match result {
            Ok(output) => Outcome::Launched { kind, output },
            Err(error) => Outcome::LaunchFailed { kind, error },
        }
    }

    fn reject(&mut self, reason: SkipReason) -> Outcome {
        self.advance(Stage::GateReject);
        if let SkipReason::Debounced { age } = reason {
            tracing::info!("Debounced, last launch {:?} ago", age);
            self.best_effort(|log, _| log.append_line("aborting"));
        }
        self.advance(Stage::End);
        Outcome::Skipped(reason)
    }

    fn advance(&mut self, next: Stage) {
        let current = self.stage();
        debug_assert!(
            current.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            current,
            next
        );
        tracing::debug!("{:?} -> {:?}", current, next);
        self.stages.push(next);
    }

    /// Log writes never fail a run
    fn best_effort<F>(&self, write: F)
    where
        F: FnOnce(&InvocationLog, &UdevEvent) -> std::io::Result<()>,
    {
        if let Err(e) = write(&self.log, &self.event) {
            tracing::warn!("Failed to write {}: {}", self.log.path().display(), e);
        }
    }
}
