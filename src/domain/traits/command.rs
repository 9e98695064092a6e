use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::domain::entities::{ChatEvent, CommandProps, MessageChain, Session, UserRecord};

/// A command invoked from chat messages
#[async_trait]
pub trait ChatCommand: Send + Sync {
    /// Name, aliases and permission requirements
    fn props(&self) -> &CommandProps;

    /// Usage text shown when arguments are missing or malformed
    fn help(&self) -> String {
        String::new()
    }

    /// Whether `user` may run this command for `event`
    fn has_permission(&self, user: &UserRecord, _event: &ChatEvent) -> bool {
        let props = self.props();
        user.compare_level(props.level) && user.has_permission(&props.permission)
    }

    /// Run the command; an empty chain means "no reply"
    async fn execute(
        &self,
        event: &ChatEvent,
        args: &[String],
        user: &UserRecord,
    ) -> Result<MessageChain, CommandError>;

    /// Whether sessions owned by this command accept follow-up messages
    fn can_handle_continued_input(&self) -> bool {
        false
    }

    /// Receive a non-command message intercepted by `session`
    async fn handle_input(
        &self,
        _event: &ChatEvent,
        _user: &UserRecord,
        _session: &Session,
    ) -> Result<(), CommandError> {
        Ok(())
    }

    /// Called once when an auto-closing session owned by this command times out
    async fn before_session_expired(&self, _session: &Session) {}
}

/// A command typed by the local operator
#[async_trait]
pub trait ConsoleCommand: Send + Sync {
    fn props(&self) -> &CommandProps;

    async fn execute(&self, args: &[String]) -> Result<String, CommandError>;
}
