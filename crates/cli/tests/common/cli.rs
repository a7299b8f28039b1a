//! Execution helper for the `rokid-hook` binary
//!
//! Wraps the binary with a builder that starts from a clean udev/hook
//! environment, so the developer's shell never leaks into a test.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

/// Variables stripped from every test run unless set explicitly
const SCRUBBED_ENV: &[&str] = &[
    "DRIVER",
    "ACTION",
    "ROKID_HOOK_CONFIG",
    "ROKID_HOOK_LOCK",
    "ROKID_HOOK_LOG",
    "ROKID_HOOK_CTL",
    "ROKID_HOOK_LOG_LEVEL",
    "RUST_LOG",
];

/// Command builder for the hook binary
pub struct HookCommand {
    binary_path: PathBuf,
    args: Vec<OsString>,
    env: HashMap<String, String>,
}

impl HookCommand {
    pub fn new() -> Self {
        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_rokid-hook")),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(OsString::from));
        self
    }

    /// Add an argument that need not be UTF-8
    pub fn arg_os(&mut self, arg: OsString) -> &mut Self {
        self.args.push(arg);
        self
    }

    /// Set environment variable
    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Simulate a udev event
    pub fn udev(&mut self, driver: &str, action: &str) -> &mut Self {
        self.env("DRIVER", driver).env("ACTION", action)
    }

    /// Execute and capture the result with timing
    pub fn execute(&self) -> Result<CommandResult> {
        let start = Instant::now();

        let mut command = Command::new(&self.binary_path);
        for key in SCRUBBED_ENV {
            command.env_remove(key);
        }
        let output = command
            .args(&self.args)
            .envs(&self.env)
            .output()
            .context("Failed to execute rokid-hook")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    /// Execute and assert a zero exit
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and assert a specific exit code
    pub fn assert_exit(&self, expected: i32) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.exit_code != expected {
            anyhow::bail!(
                "Expected exit code {}, got {}:\nArgs: {:?}\nStderr: {}",
                expected,
                result.exit_code,
                self.args,
                result.stderr
            );
        }

        Ok(result)
    }
}

/// Command execution result with timing
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
