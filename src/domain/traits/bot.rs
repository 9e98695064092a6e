use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::MessageChain;

/// Bot trait - abstraction for the messaging client that delivers replies
#[async_trait]
pub trait Bot: Send + Sync {
    /// Start the bot and begin listening for messages
    async fn start(&self) -> Result<(), BotError>;

    /// Send a message to a subject (group or user)
    async fn send_message(&self, subject: &str, message: &MessageChain) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
}
