use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::domain::entities::{ChatEvent, CommandProps, MessageChain, UserLevel, UserRecord};
use crate::domain::traits::ChatCommand;

/// `version` - reply with the bot name and version
pub struct VersionCommand {
    props: CommandProps,
    bot_name: String,
}

impl VersionCommand {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            props: CommandProps::new("version")
                .with_aliases(["v"])
                .with_description("Show bot version")
                .with_level(UserLevel::Guest),
            bot_name: bot_name.into(),
        }
    }
}

#[async_trait]
impl ChatCommand for VersionCommand {
    fn props(&self) -> &CommandProps {
        &self.props
    }

    fn help(&self) -> String {
        "/version - Show bot version".to_string()
    }

    async fn execute(&self, _event: &ChatEvent, _args: &[String], _user: &UserRecord) -> Result<MessageChain, CommandError> {
        Ok(MessageChain::text(format!("{} v{}", self.bot_name, env!("CARGO_PKG_VERSION"))))
    }
}
