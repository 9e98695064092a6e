//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;
pub mod session;

pub use user::{UserLevel, UserRecord};
pub use message::{ChatEvent, MemberRole, MessageChain, Segment, Sender};
pub use command::CommandProps;
pub use session::{Session, SessionId, SessionKind};
