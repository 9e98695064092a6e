//! Process-wide bot switches shared by the dispatcher and diagnostic commands

use std::sync::atomic::{AtomicBool, Ordering};

/// Global on/off switch; while off only the diagnostic command is served
#[derive(Debug)]
pub struct BotState {
    enabled: AtomicBool,
}

impl BotState {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Flip the switch, returning the new value
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::SeqCst)
    }
}

impl Default for BotState {
    fn default() -> Self {
        Self::new(true)
    }
}
