//! Domain traits - Abstractions for commands and infrastructure implementations

pub mod bot;
pub mod command;
pub mod store;

pub use bot::{Bot, BotInfo};
pub use command::{ChatCommand, ConsoleCommand};
pub use store::{CooldownService, GroupConfigService, UserStore};
