//! comet-bot - chat command dispatch and session engine
//!
//! Decides for every inbound chat event whether it is a command, who owns
//! it, whether the sender may run it, and whether an active session should
//! take the message instead.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod commands;

pub use application::messaging::{CommandStatus, ExecutedResult, MessageDispatcher};
pub use application::services::{BotState, CommandRegistry, RegisteredCommand, SessionStore};
