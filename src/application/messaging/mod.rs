//! Message handling - Parsing, dispatching and outbound filtering

pub mod dispatcher;
pub mod filter;
pub mod parser;

pub use dispatcher::{CommandStatus, ExecutedResult, MessageDispatcher};
pub use filter::ContentFilter;
pub use parser::CommandParser;
