//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (User, Message, Command, Session)
//! - Traits: Abstractions for commands and collaborators (ChatCommand, UserStore)

pub mod entities;
pub mod traits;
