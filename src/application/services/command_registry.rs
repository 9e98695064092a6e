//! Command registry - Chat and console commands with unique names

use std::sync::{Arc, RwLock};

use crate::domain::entities::CommandProps;
use crate::domain::traits::{ChatCommand, ConsoleCommand};

/// A command handed to the registry
#[derive(Clone)]
pub enum RegisteredCommand {
    Chat(Arc<dyn ChatCommand>),
    Console(Arc<dyn ConsoleCommand>),
}

impl RegisteredCommand {
    pub fn chat<C: ChatCommand + 'static>(command: C) -> Self {
        RegisteredCommand::Chat(Arc::new(command))
    }

    pub fn console<C: ConsoleCommand + 'static>(command: C) -> Self {
        RegisteredCommand::Console(Arc::new(command))
    }

    pub fn props(&self) -> &CommandProps {
        match self {
            RegisteredCommand::Chat(c) => c.props(),
            RegisteredCommand::Console(c) => c.props(),
        }
    }
}

#[derive(Default)]
struct Commands {
    chat: Vec<Arc<dyn ChatCommand>>,
    console: Vec<Arc<dyn ConsoleCommand>>,
}

impl Commands {
    fn all_props(&self) -> impl Iterator<Item = &CommandProps> {
        self.chat
            .iter()
            .map(|c| c.props())
            .chain(self.console.iter().map(|c| c.props()))
    }
}

/// Registry for chat and console commands.
///
/// Names and aliases are unique across both kinds; a conflicting
/// registration is rejected with a warning.
#[derive(Default)]
pub struct CommandRegistry {
    commands: RwLock<Commands>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, returning `false` if a name or alias is taken
    pub fn register(&self, command: RegisteredCommand) -> bool {
        let mut commands = match self.commands.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let props = command.props();
        if let Some(taken) = commands.all_props().find_map(|p| props.conflicts_with(p)) {
            tracing::warn!(
                "[command] refusing to register '{}': name or alias '{}' is already registered",
                props.name,
                taken
            );
            return false;
        }

        tracing::debug!("[command] registered '{}'", props.name);
        match command {
            RegisteredCommand::Chat(c) => commands.chat.push(c),
            RegisteredCommand::Console(c) => commands.console.push(c),
        }
        true
    }

    /// Register several commands, returning how many were accepted
    pub fn register_all(&self, commands: impl IntoIterator<Item = RegisteredCommand>) -> usize {
        commands.into_iter().filter(|c| self.register(c.clone())).count()
    }

    /// Find the chat command owning `token` as its name, else as an alias
    pub fn resolve(&self, token: &str) -> Option<Arc<dyn ChatCommand>> {
        if token.is_empty() {
            return None;
        }
        let commands = self.commands.read().ok()?;
        commands
            .chat
            .iter()
            .find(|c| c.props().name == token)
            .or_else(|| commands.chat.iter().find(|c| c.props().matches(token)))
            .cloned()
    }

    /// Console counterpart of [`CommandRegistry::resolve`]
    pub fn resolve_console(&self, token: &str) -> Option<Arc<dyn ConsoleCommand>> {
        if token.is_empty() {
            return None;
        }
        let commands = self.commands.read().ok()?;
        commands
            .console
            .iter()
            .find(|c| c.props().name == token)
            .or_else(|| commands.console.iter().find(|c| c.props().matches(token)))
            .cloned()
    }

    /// Total of chat and console commands
    pub fn count(&self) -> usize {
        self.commands
            .read()
            .map(|c| c.chat.len() + c.console.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Descriptors of every chat command, in registration order
    pub fn chat_commands(&self) -> Vec<CommandProps> {
        self.commands
            .read()
            .map(|c| c.chat.iter().map(|cmd| cmd.props().clone()).collect())
            .unwrap_or_default()
    }
}
