use super::UserLevel;

/// Immutable descriptor of a registered command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandProps {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    /// Permission key checked by the default permission predicate
    pub permission: String,
    pub level: UserLevel,
}

impl CommandProps {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            permission: String::new(),
            level: UserLevel::User,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = permission.into();
        self
    }

    pub fn with_level(mut self, level: UserLevel) -> Self {
        self.level = level;
        self
    }

    /// Name followed by every alias
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Exact, case-sensitive match against the name or any alias
    pub fn matches(&self, token: &str) -> bool {
        !token.is_empty() && self.names().any(|n| n == token)
    }

    /// First name or alias shared with `other`, if any
    pub fn conflicts_with<'a>(&'a self, other: &CommandProps) -> Option<&'a str> {
        self.names().find(|n| other.names().any(|o| o == *n))
    }
}
