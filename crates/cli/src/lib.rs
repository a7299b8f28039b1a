//! Library half of the `rokid-hook` binary

pub mod config;
pub mod exit;
pub mod logging;
