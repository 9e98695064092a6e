//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: User records
//! - Cooldown / GroupConfig: Collaborator services used by the dispatcher
//! - Adapters: Platform integrations (console)

pub mod config;
pub mod storage;
pub mod cooldown;
pub mod group_config;
pub mod adapters;
