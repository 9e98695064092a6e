//! Application services - Shared state used by the dispatcher

pub mod bot_state;
pub mod command_registry;
pub mod session_store;

pub use bot_state::BotState;
pub use command_registry::{CommandRegistry, RegisteredCommand};
pub use session_store::{sweep_expires, SessionInfo, SessionStore};
