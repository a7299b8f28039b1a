//! Trigger classification
//!
//! udev exports `DRIVER` and `ACTION` into the environment of the programs a
//! rule runs. A run without `ACTION` was started by hand.

/// The raw udev fields of one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UdevEvent {
    /// `DRIVER`, if set
    pub driver: Option<String>,
    /// `ACTION`, if set
    pub action: Option<String>,
}

impl UdevEvent {
    pub fn new(driver: Option<String>, action: Option<String>) -> Self {
        Self { driver, action }
    }

    /// Read `DRIVER` and `ACTION` from the process environment
    pub fn from_env() -> Self {
        Self {
            driver: std::env::var("DRIVER").ok(),
            action: std::env::var("ACTION").ok(),
        }
    }

    /// `DRIVER` as logged (empty when unset)
    pub fn driver_str(&self) -> &str {
        self.driver.as_deref().unwrap_or("")
    }

    /// `ACTION` as logged (empty when unset)
    pub fn action_str(&self) -> &str {
        self.action.as_deref().unwrap_or("")
    }
}

/// What started this invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Launched directly, no `ACTION`
    Manual,
    /// A bind of the recognized HID driver
    HidBind,
    /// Any other udev event
    Other,
}

/// Driver/action pair that counts as a HID bind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    pub driver: String,
    pub action: String,
}

impl Default for TriggerMatch {
    fn default() -> Self {
        Self {
            driver: "hid".to_string(),
            action: "bind".to_string(),
        }
    }
}

impl TriggerMatch {
    /// Classify an event. An empty `ACTION` counts as unset.
    pub fn classify(&self, event: &UdevEvent) -> TriggerKind {
        let action = event.action_str();
        if action.is_empty() {
            return TriggerKind::Manual;
        }

        if event.driver_str() == self.driver && action == self.action {
            TriggerKind::HidBind
        } else {
            TriggerKind::Other
        }
    }
}
