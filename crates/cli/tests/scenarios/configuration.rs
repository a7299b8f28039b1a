//! Config file handling

use crate::common::HookEnv;
use anyhow::Result;

#[test]
fn failing_control_is_not_propagated_by_default() -> Result<()> {
    let env = HookEnv::with_control("echo \"ctl: $*\"\nexit 7");

    env.hook().assert_success()?;

    assert!(env.log().ends_with("exit status: 7\n"));
    Ok(())
}

#[test]
fn failing_control_propagates_when_configured() -> Result<()> {
    let env = HookEnv::with_control("exit 7");
    env.write_config("[launch]\npropagate_exit_status = true\n");

    env.hook().assert_exit(7)?;
    Ok(())
}

#[test]
fn configured_defaults_replace_builtin_params() -> Result<()> {
    let env = HookEnv::new();
    env.write_config("[launch]\ndefault_params = [\"--mode\", \"1920x1080-60hz\"]\n");

    env.hook().assert_success()?;

    assert_eq!(env.ctl_lines(), vec!["ctl: --mode 1920x1080-60hz"]);
    Ok(())
}

#[test]
fn configured_trigger_is_honoured() -> Result<()> {
    let env = HookEnv::new();
    env.write_config("[trigger]\ndriver = \"hid-generic\"\naction = \"add\"\n");

    env.hook().udev("hid", "bind").assert_success()?;
    assert!(env.ctl_lines().is_empty());

    env.hook().udev("hid-generic", "add").assert_success()?;
    assert_eq!(env.ctl_lines().len(), 1);
    Ok(())
}

#[test]
fn invalid_config_exits_3() -> Result<()> {
    let env = HookEnv::new();
    env.write_config("[debounce]\nwindow_secs = 0\n");

    let result = env.hook().assert_exit(3)?;

    assert!(result.stderr.contains("Invalid configuration"));
    assert!(env.ctl_lines().is_empty());
    Ok(())
}

#[test]
fn bare_control_name_is_found_on_path() -> Result<()> {
    let env = HookEnv::new();
    let path = match std::env::var("PATH") {
        Ok(existing) if !existing.is_empty() => format!("{}:{}", env.root().display(), existing),
        _ => env.root().display().to_string(),
    };

    env.hook()
        .env("ROKID_HOOK_CTL", "rokid_max_ctl")
        .env("PATH", &path)
        .assert_success()?;

    assert_eq!(
        env.ctl_lines(),
        vec!["ctl: --mode 1920x1200-60hz --vol 1 --brightness 2"]
    );
    Ok(())
}

#[test]
fn bare_control_name_missing_from_path_exits_2() -> Result<()> {
    let env = HookEnv::new();

    env.hook()
        .env("ROKID_HOOK_CTL", "rokid_max_ctl_not_installed")
        .assert_exit(2)?;

    assert!(env
        .log()
        .contains("launch failed: control binary not found: rokid_max_ctl_not_installed"));
    Ok(())
}
