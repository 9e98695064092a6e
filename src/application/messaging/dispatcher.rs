//! Message dispatcher - Routes chat events to sessions and commands

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::application::errors::CommandError;
use crate::application::services::{BotState, CommandRegistry, SessionStore};
use crate::domain::entities::{ChatEvent, MessageChain, UserRecord};
use crate::domain::traits::{ChatCommand, CooldownService, GroupConfigService, UserStore};
use super::filter::ContentFilter;
use super::parser::CommandParser;

pub const DISABLED_NOTICE: &str = "This command has been disabled by an administrator";
pub const NO_PERMISSION_NOTICE: &str = "You don't have permission!";
pub const FAILURE_NOTICE: &str = "An error occurred while executing the command, please contact an administrator";

/// Default name of the command still served while the bot is switched off
pub const DIAGNOSTIC_COMMAND: &str = "debug";

/// Outcome of one dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandStatus {
    #[default]
    Success,
    NoPermission,
    Failed,
    Disabled,
    MovedToSession,
}

impl CommandStatus {
    pub fn name(&self) -> &str {
        match self {
            CommandStatus::Success => "success",
            CommandStatus::NoPermission => "no permission",
            CommandStatus::Failed => "failed",
            CommandStatus::Disabled => "disabled",
            CommandStatus::MovedToSession => "moved to session",
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == CommandStatus::Success
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the caller should send back, and why
#[derive(Clone)]
pub struct ExecutedResult {
    pub message: MessageChain,
    pub command: Option<Arc<dyn ChatCommand>>,
    pub status: CommandStatus,
}

impl ExecutedResult {
    pub fn new(message: MessageChain, command: Option<Arc<dyn ChatCommand>>, status: CommandStatus) -> Self {
        Self { message, command, status }
    }

    /// Empty reply with the default status
    pub fn empty(command: Option<Arc<dyn ChatCommand>>) -> Self {
        Self::new(MessageChain::empty(), command, CommandStatus::default())
    }

    pub fn command_name(&self) -> Option<&str> {
        self.command.as_ref().map(|c| c.props().name.as_str())
    }

    /// Whether there is anything to deliver
    pub fn has_reply(&self) -> bool {
        !self.message.is_empty()
    }
}

impl fmt::Debug for ExecutedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutedResult")
            .field("message", &self.message)
            .field("command", &self.command_name())
            .field("status", &self.status)
            .finish()
    }
}

/// Message dispatcher.
///
/// Owns no state of its own: the registry, session store and collaborator
/// services are injected and shared with the rest of the bot.
pub struct MessageDispatcher {
    registry: Arc<CommandRegistry>,
    sessions: Arc<SessionStore>,
    users: Arc<dyn UserStore>,
    cooldown: Arc<dyn CooldownService>,
    groups: Arc<dyn GroupConfigService>,
    parser: CommandParser,
    filter: ContentFilter,
    state: Arc<BotState>,
    diagnostic_command: String,
}

impl MessageDispatcher {
    pub fn new(
        registry: Arc<CommandRegistry>,
        sessions: Arc<SessionStore>,
        users: Arc<dyn UserStore>,
        cooldown: Arc<dyn CooldownService>,
        groups: Arc<dyn GroupConfigService>,
    ) -> Self {
        Self {
            registry,
            sessions,
            users,
            cooldown,
            groups,
            parser: CommandParser::default(),
            filter: ContentFilter::default(),
            state: Arc::new(BotState::default()),
            diagnostic_command: DIAGNOSTIC_COMMAND.to_string(),
        }
    }

    pub fn with_parser(mut self, parser: CommandParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_filter(mut self, filter: ContentFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_state(mut self, state: Arc<BotState>) -> Self {
        self.state = state;
        self
    }

    pub fn with_diagnostic_command(mut self, name: impl Into<String>) -> Self {
        self.diagnostic_command = name.into();
        self
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn state(&self) -> &Arc<BotState> {
        &self.state
    }

    /// Dispatch one inbound chat event. Never fails; errors become notices.
    pub async fn dispatch(&self, event: &ChatEvent) -> ExecutedResult {
        let started = Instant::now();
        let text = event.text();
        let token = self.parser.command_name(&text);
        let command = self.registry.resolve(&token);
        let user = self.users.resolve_user(&event.sender.id).await;

        if !self.state.is_enabled() && !self.is_diagnostic(&token, command.as_deref()) {
            return ExecutedResult::empty(command);
        }

        let result = match self.route(event, &text, &user, command.clone()).await {
            Ok(result) => result,
            Err(error) => self.on_failure(error, event, &text, &user, command),
        };

        if result.command.is_some() {
            tracing::debug!(
                "[command] {} took {:?}, status: {}",
                result.command_name().unwrap_or_default(),
                started.elapsed(),
                result.status
            );
        }

        ExecutedResult {
            message: self.filter.filter(result.message),
            ..result
        }
    }

    /// Dispatch a console line. Failures are logged and yield an empty string.
    pub async fn dispatch_console(&self, text: &str) -> String {
        let token = self.parser.command_name(text);
        let Some(command) = self.registry.resolve_console(&token) else {
            return String::new();
        };

        let args = self.parser.arguments(text);
        tracing::debug!("[command] console is running: {}", command.props().name);
        match command.execute(&args).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("[command] console command failed, input: {:?}: {:?}", text, e);
                String::new()
            }
        }
    }

    fn is_diagnostic(&self, token: &str, command: Option<&dyn ChatCommand>) -> bool {
        token == self.diagnostic_command
            || command.map_or(false, |c| c.props().name == self.diagnostic_command)
    }

    async fn route(
        &self,
        event: &ChatEvent,
        text: &str,
        user: &UserRecord,
        command: Option<Arc<dyn ChatCommand>>,
    ) -> Result<ExecutedResult, CommandError> {
        let prefixed = self.parser.is_command_prefix(text);

        // Unprefixed text goes to an active session first
        if !prefixed {
            if let Some(session) = self.sessions.resolve_for_event(event) {
                let owner = session.command();
                if owner.can_handle_continued_input() {
                    self.sessions.touch(session.id());
                    owner.handle_input(event, user, &session).await?;
                }
                if !session.is_persistent() {
                    return Ok(ExecutedResult::new(
                        MessageChain::empty(),
                        command,
                        CommandStatus::MovedToSession,
                    ));
                }
            }
        }

        if let (Some(cmd), Some(group_id)) = (&command, &event.group_id) {
            if self.groups.is_command_disabled(group_id, &cmd.props().name) {
                let message = if self.cooldown.is_on_cooldown(&user.id) {
                    MessageChain::empty()
                } else {
                    MessageChain::text(DISABLED_NOTICE)
                };
                return Ok(ExecutedResult::new(message, command, CommandStatus::Disabled));
            }
        }

        if prefixed {
            if let Some(cmd) = &command {
                let args = self.parser.arguments(text);
                tracing::debug!("[command] {} is running: {}", user.id, text);

                if !cmd.has_permission(user, event) {
                    return Ok(ExecutedResult::new(
                        MessageChain::text(NO_PERMISSION_NOTICE),
                        command,
                        CommandStatus::NoPermission,
                    ));
                }

                let message = cmd.execute(event, &args, user).await?;
                return Ok(ExecutedResult::new(message, command, CommandStatus::Success));
            }
        }

        Ok(ExecutedResult::empty(None))
    }

    fn on_failure(
        &self,
        error: CommandError,
        event: &ChatEvent,
        text: &str,
        user: &UserRecord,
        command: Option<Arc<dyn ChatCommand>>,
    ) -> ExecutedResult {
        let message = if error.is_timeout() {
            tracing::warn!("[command] network operation timed out: {:?}", error);
            MessageChain::text(format!(
                "Bot > Connection timed out during a network operation: {}",
                error
            ))
        } else {
            tracing::warn!(
                "[command] error while executing command, input: {:?}, sender: {}\n{}",
                text.split_whitespace().collect::<Vec<_>>(),
                event.sender.id,
                error_report(&error)
            );
            if user.is_bot_owner() {
                MessageChain::text(format!(
                    "An error occurred while executing the command\nError detail: {}: {}",
                    error.kind(),
                    error
                ))
            } else {
                MessageChain::text(FAILURE_NOTICE)
            }
        };
        ExecutedResult::new(message, command, CommandStatus::Failed)
    }
}

/// Debug rendering of an error followed by its source chain
fn error_report(error: &CommandError) -> String {
    let mut report = format!("{:?}", error);
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        report.push_str(&format!("\ncaused by: {}", cause));
        source = std::error::Error::source(cause);
    }
    report
}
