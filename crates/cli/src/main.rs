//! rokid-hook - udev hook for Rokid Max glasses
//!
//! Run by a udev rule when the glasses' HID interface binds, or by hand.
//! Debounces repeated bind events and forwards display/volume/brightness
//! parameters to `rokid_max_ctl`.

use anyhow::{Context, Result};
use clap::Parser;
use cli_lib::config::HookConfig;
use cli_lib::exit::{exit_code, EXIT_CONFIG};
use cli_lib::logging;
use hook_core::{DebounceMarker, Gate, Invocation, InvocationLog, ProcessControl, UdevEvent};
use std::ffi::OsString;
use std::process::ExitCode;

/// Apply display settings to Rokid Max glasses on hotplug
///
/// All arguments are forwarded verbatim to the control binary, except a
/// leading bare `--`, which is taken as the end of the hook's own options.
#[derive(Parser)]
#[command(name = "rokid-hook")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Parameters for rokid_max_ctl (default: --mode 1920x1200-60hz --vol 1 --brightness 2)
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(OsString)
    )]
    params: Vec<OsString>,
}

fn main() -> ExitCode {
    let _guard = logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let config = HookConfig::load().context("Failed to load configuration")?;
    let event = UdevEvent::from_env();

    tracing::debug!(
        "DRIVER={:?} ACTION={:?} params={:?}",
        event.driver,
        event.action,
        cli.params
    );

    let gate = Gate::new(
        config.trigger_match(),
        DebounceMarker::new(&config.paths.lock, config.window()),
    );
    let log = InvocationLog::new(&config.paths.log);
    let control = ProcessControl::new(&config.paths.control, &config.paths.log);

    let mut invocation = Invocation::new(
        event,
        cli.params,
        config.default_params(),
        gate,
        log,
        control,
    );
    let outcome = invocation.run();

    Ok(exit_code(&outcome, config.launch.propagate_exit_status))
}
