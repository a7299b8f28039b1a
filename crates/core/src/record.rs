//! Append-only invocation log
//!
//! Every run appends a short record:
//!
//! ```text
//!
//! Mon Oct 19 14:03:07 +0200 2026
//! DRIVER = hid
//! ACTION = bind
//! ```
//!
//! Manual runs follow it with an environment dump and `ARGS = ...`. The
//! control binary's own output is appended after that.

use crate::fsutil::{open_append, relax_permissions};
use crate::trigger::UdevEvent;
use chrono::{DateTime, TimeZone};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// `date`-like timestamp with a numeric zone
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %z %Y";

/// Shared invocation log file
#[derive(Debug, Clone)]
pub struct InvocationLog {
    path: PathBuf,
}

impl InvocationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append raw text in a single write
    pub fn append(&self, text: &str) -> io::Result<()> {
        let mut file = open_append(&self.path)?;
        file.write_all(text.as_bytes())
    }

    /// Separator, timestamp and the udev fields
    pub fn append_arrival<Tz>(&self, at: &DateTime<Tz>, event: &UdevEvent) -> io::Result<()>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.append(&format_arrival(at, event))
    }

    /// Environment dump and literal argument list
    pub fn append_environment(
        &self,
        env: &BTreeMap<String, String>,
        args: &[OsString],
    ) -> io::Result<()> {
        self.append(&format_environment(env, args))
    }

    /// A single line, newline appended
    pub fn append_line(&self, line: &str) -> io::Result<()> {
        self.append(&format!("{}\n", line))
    }

    /// Append handle for a child's stdout/stderr
    pub fn output_sink(&self) -> io::Result<File> {
        open_append(&self.path)
    }

    pub fn relax_permissions(&self, mode: u32) -> io::Result<()> {
        relax_permissions(&self.path, mode)
    }
}

pub fn format_arrival<Tz>(at: &DateTime<Tz>, event: &UdevEvent) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "\n{}\nDRIVER = {}\nACTION = {}\n",
        at.format(TIMESTAMP_FORMAT),
        event.driver_str(),
        event.action_str()
    )
}

/// Non-UTF-8 arguments are rendered lossily; only the log line is affected
pub fn format_environment(env: &BTreeMap<String, String>, args: &[OsString]) -> String {
    let mut out = String::new();
    for (key, value) in env {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out.push_str("ARGS = ");
    let rendered: Vec<_> = args.iter().map(|a| a.to_string_lossy()).collect();
    out.push_str(&rendered.join(" "));
    out.push('\n');
    out
}

/// Snapshot of the process environment, sorted by key
pub fn environment_snapshot() -> BTreeMap<String, String> {
    std::env::vars_os()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect()
}
