//! End-to-end hook scenarios

pub mod configuration;
pub mod udev;
