//! Diagnostic commands: session listing, bot info and the global switch

use async_trait::async_trait;
use std::fmt::Write;
use std::sync::{Arc, Weak};

use crate::application::errors::CommandError;
use crate::application::services::{BotState, CommandRegistry, SessionStore};
use crate::domain::entities::{ChatEvent, CommandProps, MessageChain, UserLevel, UserRecord};
use crate::domain::traits::{ChatCommand, ConsoleCommand};

fn usage(name: &str) -> String {
    format!("Usage: {} <sessions|info|switch>", name)
}

/// Shared implementation behind the chat and console diagnostic commands.
///
/// Holds the registry weakly since the registry owns the commands built on it.
#[derive(Clone)]
pub struct Diagnostics {
    state: Arc<BotState>,
    sessions: Arc<SessionStore>,
    registry: Weak<CommandRegistry>,
}

impl Diagnostics {
    pub fn new(state: Arc<BotState>, sessions: Arc<SessionStore>, registry: &Arc<CommandRegistry>) -> Self {
        Self {
            state,
            sessions,
            registry: Arc::downgrade(registry),
        }
    }

    /// Run a subcommand on behalf of the command called `name`
    pub fn run(&self, name: &str, args: &[String]) -> Result<String, CommandError> {
        match args.first().map(String::as_str) {
            Some("sessions") => Ok(self.sessions_report()),
            Some("info") => Ok(self.info()),
            Some("switch") => {
                let enabled = self.state.toggle();
                tracing::info!("[debug] bot switched {}", if enabled { "on" } else { "off" });
                Ok(if enabled { "Bot > Back online".to_string() } else { "Bot > Going quiet".to_string() })
            }
            Some(other) => Err(CommandError::InvalidArgs(format!("unknown subcommand '{}'", other))),
            None => Ok(usage(name)),
        }
    }

    fn sessions_report(&self) -> String {
        let sessions = self.sessions.sessions();
        if sessions.is_empty() {
            return "Active sessions: none".to_string();
        }
        let mut report = "Active sessions:".to_string();
        for (i, info) in sessions.iter().enumerate() {
            let _ = write!(report, "\n{} {} idle {}s", i + 1, info.session, info.idle.as_secs());
            if info.auto_close {
                report.push_str(" (auto-close)");
            }
        }
        report
    }

    fn info(&self) -> String {
        let commands = self.registry.upgrade().map(|r| r.count()).unwrap_or(0);
        format!(
            "comet-bot v{}\nRegistered commands: {}\nActive sessions: {}\nEnabled: {}",
            env!("CARGO_PKG_VERSION"),
            commands,
            self.sessions.len(),
            self.state.is_enabled()
        )
    }
}

/// `debug` in chat; owner only, and still served while the bot is switched off
pub struct DebugCommand {
    props: CommandProps,
    diagnostics: Diagnostics,
}

impl DebugCommand {
    pub fn new(name: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self {
            props: CommandProps::new(name)
                .with_description("Bot diagnostics")
                .with_level(UserLevel::Owner),
            diagnostics,
        }
    }
}

#[async_trait]
impl ChatCommand for DebugCommand {
    fn props(&self) -> &CommandProps {
        &self.props
    }

    fn help(&self) -> String {
        usage(&self.props.name)
    }

    async fn execute(&self, _event: &ChatEvent, args: &[String], _user: &UserRecord) -> Result<MessageChain, CommandError> {
        match self.diagnostics.run(&self.props.name, args) {
            Ok(text) => Ok(MessageChain::text(text)),
            Err(CommandError::InvalidArgs(_)) => Ok(MessageChain::text(self.help())),
            Err(e) => Err(e),
        }
    }
}

/// `status` at the console
pub struct StatusCommand {
    props: CommandProps,
    diagnostics: Diagnostics,
}

impl StatusCommand {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            props: CommandProps::new("status")
                .with_aliases(["st"])
                .with_level(UserLevel::Console),
            diagnostics,
        }
    }
}

#[async_trait]
impl ConsoleCommand for StatusCommand {
    fn props(&self) -> &CommandProps {
        &self.props
    }

    async fn execute(&self, args: &[String]) -> Result<String, CommandError> {
        self.diagnostics.run(&self.props.name, args)
    }
}
