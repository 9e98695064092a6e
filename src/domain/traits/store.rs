use async_trait::async_trait;

use crate::domain::entities::UserRecord;

/// User lookup; unknown ids resolve to a guest record
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn resolve_user(&self, id: &str) -> UserRecord;
}

/// Per-sender rate limit consulted before repeating notices
pub trait CooldownService: Send + Sync {
    fn is_on_cooldown(&self, id: &str) -> bool;
}

/// Per-group command switches
pub trait GroupConfigService: Send + Sync {
    fn is_command_disabled(&self, group_id: &str, command: &str) -> bool;
}
