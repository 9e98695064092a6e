use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::traits::ChatCommand;

/// Opaque handle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a session treats the messages it intercepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Consumes the intercepted message and ends that dispatch cycle
    Transient,
    /// Listens alongside normal command processing until closed
    Persistent,
}

impl SessionKind {
    pub fn as_str(&self) -> &str {
        match self {
            SessionKind::Transient => "transient",
            SessionKind::Persistent => "persistent",
        }
    }
}

/// Conversational state that intercepts later messages from its members or group
pub struct Session {
    id: SessionId,
    command: Arc<dyn ChatCommand>,
    kind: SessionKind,
    group_id: Option<String>,
    members: HashSet<String>,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(command: Arc<dyn ChatCommand>, kind: SessionKind) -> Self {
        Self {
            id: SessionId::new(),
            command,
            kind,
            group_id: None,
            members: HashSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn transient(command: Arc<dyn ChatCommand>) -> Self {
        Self::new(command, SessionKind::Transient)
    }

    pub fn persistent(command: Arc<dyn ChatCommand>) -> Self {
        Self::new(command, SessionKind::Persistent)
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_member(mut self, user_id: impl Into<String>) -> Self {
        self.members.insert(user_id.into());
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn command(&self) -> &Arc<dyn ChatCommand> {
        &self.command
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Membership predicate used for user-scoped lookup
    pub fn accepts_user(&self, user_id: &str) -> bool {
        self.members.contains(user_id)
    }

    pub fn is_persistent(&self) -> bool {
        self.kind == SessionKind::Persistent
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("command", &self.command.props().name)
            .field("kind", &self.kind)
            .field("group_id", &self.group_id)
            .field("members", &self.members)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} ({})", self.command.props().name, self.id, self.kind.as_str())?;
        if let Some(group) = &self.group_id {
            write!(f, " group={}", group)?;
        }
        Ok(())
    }
}
