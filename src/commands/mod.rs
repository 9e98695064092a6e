//! Built-in commands

pub mod diagnostics;
pub mod version;

use std::sync::Arc;

use crate::application::services::{BotState, CommandRegistry, RegisteredCommand, SessionStore};
pub use diagnostics::{DebugCommand, Diagnostics, StatusCommand};
pub use version::VersionCommand;

/// Register the commands every bot ships with, returning how many were accepted
pub fn register_defaults(
    registry: &Arc<CommandRegistry>,
    state: Arc<BotState>,
    sessions: Arc<SessionStore>,
    bot_name: &str,
    diagnostic_command: &str,
) -> usize {
    let diagnostics = Diagnostics::new(state, sessions, registry);
    registry.register_all([
        RegisteredCommand::chat(VersionCommand::new(bot_name)),
        RegisteredCommand::chat(DebugCommand::new(diagnostic_command, diagnostics.clone())),
        RegisteredCommand::console(StatusCommand::new(diagnostics)),
    ])
}
