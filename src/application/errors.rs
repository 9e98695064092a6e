//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Operation timed out")]
    Elapsed(#[from] tokio::time::error::Elapsed),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl CommandError {
    /// Network-timeout classification used by the dispatcher
    pub fn is_timeout(&self) -> bool {
        match self {
            CommandError::Timeout(_) | CommandError::Elapsed(_) => true,
            CommandError::Network(e) => e.is_timeout() || mentions_timeout(&e.to_string()),
            CommandError::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
            CommandError::ExecutionFailed(msg) => mentions_timeout(msg),
            CommandError::InvalidArgs(_) | CommandError::PermissionDenied => false,
        }
    }

    /// Variant name, used in the detailed report for bot owners
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::InvalidArgs(_) => "InvalidArgs",
            CommandError::PermissionDenied => "PermissionDenied",
            CommandError::Timeout(_) => "Timeout",
            CommandError::Network(_) => "Network",
            CommandError::Elapsed(_) => "Elapsed",
            CommandError::Io(_) => "Io",
            CommandError::ExecutionFailed(_) => "ExecutionFailed",
        }
    }
}

fn mentions_timeout(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    msg.contains("timed out") || msg.contains("timeout")
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
