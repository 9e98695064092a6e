//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Command registry, session store, bot switches
//! - Errors: Domain-specific errors
//! - Messaging: Command parsing, dispatching, content filtering

pub mod errors;
pub mod services;
pub mod messaging;
