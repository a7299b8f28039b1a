//! Runs started by udev rules

use crate::common::HookEnv;
use anyhow::Result;
use filetime::FileTime;
use std::time::{Duration, SystemTime};

#[test]
fn hid_bind_launches_and_stamps_marker() -> Result<()> {
    let env = HookEnv::new();

    env.hook().udev("hid", "bind").assert_success()?;

    assert_eq!(env.ctl_lines().len(), 1);
    assert!(env.lock_path().exists());
    assert_eq!(env.mode(&env.lock_path()), 0o666);
    assert_eq!(env.mode(&env.log_path()), 0o666);

    let log = env.log();
    assert!(log.contains("DRIVER = hid\nACTION = bind\n"));
    assert!(!log.contains("ARGS = "));
    Ok(())
}

#[test]
fn second_bind_within_window_is_rejected() -> Result<()> {
    let env = HookEnv::new();

    env.hook().udev("hid", "bind").assert_success()?;
    std::thread::sleep(Duration::from_secs(1));
    env.hook().udev("hid", "bind").assert_exit(1)?;

    assert_eq!(env.ctl_lines().len(), 1);
    assert!(env.log().ends_with("aborting\n"));
    Ok(())
}

#[test]
fn bind_after_window_is_accepted() -> Result<()> {
    let env = HookEnv::new();
    std::fs::write(env.lock_path(), b"")?;
    let old = SystemTime::now() - Duration::from_secs(6);
    filetime::set_file_mtime(env.lock_path(), FileTime::from_system_time(old))?;

    env.hook().udev("hid", "bind").assert_success()?;

    assert_eq!(env.ctl_lines().len(), 1);
    Ok(())
}

#[test]
fn touched_marker_debounces() -> Result<()> {
    let env = HookEnv::new();
    std::fs::write(env.lock_path(), b"")?;

    env.hook().udev("hid", "bind").assert_exit(1)?;

    assert!(env.ctl_lines().is_empty());
    Ok(())
}

#[test]
fn other_events_are_skipped_quietly() -> Result<()> {
    let env = HookEnv::new();

    env.hook().udev("hid", "unbind").assert_success()?;
    env.hook().udev("usbhid", "bind").assert_success()?;

    assert!(env.ctl_lines().is_empty());
    assert!(!env.lock_path().exists());

    let log = env.log();
    assert!(log.contains("DRIVER = hid\nACTION = unbind\n"));
    assert!(log.contains("DRIVER = usbhid\nACTION = bind\n"));
    assert!(!log.contains("aborting"));
    Ok(())
}

#[test]
fn concurrent_binds_launch_once() -> Result<()> {
    let env = HookEnv::new();

    let results = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| env.hook().udev("hid", "bind").execute()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect::<Result<Vec<_>>>()
    })?;

    let accepted = results.iter().filter(|r| r.exit_code == 0).count();
    let rejected = results.iter().filter(|r| r.exit_code == 1).count();
    assert_eq!((accepted, rejected), (1, 3));
    assert_eq!(env.ctl_lines().len(), 1);
    Ok(())
}

#[test]
fn missing_control_binary_exits_2() -> Result<()> {
    let env = HookEnv::new();
    std::fs::remove_file(env.control_path())?;

    env.hook().udev("hid", "bind").assert_exit(2)?;

    assert!(env.log().contains("launch failed: control binary not found"));
    assert_eq!(env.mode(&env.log_path()), 0o666);
    Ok(())
}
