use std::collections::HashSet;
use std::fmt;

/// Privilege tier of a bot user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserLevel {
    Guest,
    #[default]
    User,
    Vip,
    Admin,
    Owner,
    /// Local operator, never held by a chat user
    Console,
}

impl UserLevel {
    pub fn as_str(&self) -> &str {
        match self {
            UserLevel::Guest => "guest",
            UserLevel::User => "user",
            UserLevel::Vip => "vip",
            UserLevel::Admin => "admin",
            UserLevel::Owner => "owner",
            UserLevel::Console => "console",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "guest" => Some(UserLevel::Guest),
            "user" => Some(UserLevel::User),
            "vip" => Some(UserLevel::Vip),
            "admin" => Some(UserLevel::Admin),
            "owner" => Some(UserLevel::Owner),
            "console" => Some(UserLevel::Console),
            _ => None,
        }
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bot user as known to the user store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub level: UserLevel,
    pub permissions: HashSet<String>,
}

impl UserRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level: UserLevel::default(),
            permissions: HashSet::new(),
        }
    }

    /// Record handed out for ids the store has never seen
    pub fn guest(id: impl Into<String>) -> Self {
        Self::new(id).with_level(UserLevel::Guest)
    }

    pub fn with_level(mut self, level: UserLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn is_bot_owner(&self) -> bool {
        self.level >= UserLevel::Owner
    }

    pub fn is_bot_admin(&self) -> bool {
        self.level >= UserLevel::Admin
    }

    /// Admins hold every permission key; everyone else needs an explicit grant
    pub fn has_permission(&self, key: &str) -> bool {
        self.is_bot_admin() || key.is_empty() || self.permissions.contains(key)
    }

    pub fn compare_level(&self, required: UserLevel) -> bool {
        self.level >= required
    }
}
