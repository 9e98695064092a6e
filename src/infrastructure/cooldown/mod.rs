//! Per-sender cooldown tracking

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::domain::traits::CooldownService;

/// Sliding cooldown per sender.
///
/// A check that finds the sender off cooldown records the use, so the next
/// check inside the window reports a cooldown.
pub struct CooldownTracker {
    last_used: Mutex<HashMap<String, Instant>>,
    window: Duration,
}

impl CooldownTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            last_used: Mutex::new(HashMap::new()),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Forget every recorded use
    pub fn reset(&self) {
        if let Ok(mut last_used) = self.last_used.lock() {
            last_used.clear();
        }
    }
}

impl CooldownService for CooldownTracker {
    fn is_on_cooldown(&self, id: &str) -> bool {
        let mut last_used = match self.last_used.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();

        // Drop stale entries while we hold the lock
        last_used.retain(|_, &mut t| now.duration_since(t) < self.window);

        if last_used.contains_key(id) {
            return true;
        }
        last_used.insert(id.to_string(), now);
        false
    }
}
