use chrono::{DateTime, Utc};

/// A single element of a message chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Mention of a member by id
    At(String),
    /// Image reference (url or platform id)
    Image(String),
    /// Platform emoticon
    Face(u32),
}

impl Segment {
    pub fn text(&self) -> Option<&str> {
        match self {
            Segment::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Plain-text rendering used when a chain is flattened for parsing
    pub fn content(&self) -> String {
        match self {
            Segment::Text(s) => s.clone(),
            Segment::At(id) => format!("@{}", id),
            Segment::Image(_) => "[image]".to_string(),
            Segment::Face(_) => "[face]".to_string(),
        }
    }
}

/// Ordered message content, as received from or sent to the platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageChain(Vec<Segment>);

impl MessageChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self(vec![Segment::Text(text.into())])
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    pub fn with(mut self, segment: Segment) -> Self {
        self.0.push(segment);
        self
    }

    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Flatten every segment into the text the command parser sees
    pub fn content_to_string(&self) -> String {
        self.0.iter().map(Segment::content).collect()
    }

    /// Ids mentioned with `At` segments, in order
    pub fn mentions(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|s| match s {
            Segment::At(id) => Some(id.as_str()),
            _ => None,
        })
    }
}

impl From<&str> for MessageChain {
    fn from(text: &str) -> Self {
        MessageChain::text(text)
    }
}

impl From<String> for MessageChain {
    fn from(text: String) -> Self {
        MessageChain::text(text)
    }
}

/// Role of the sender inside the group the event came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemberRole {
    #[default]
    Member,
    Administrator,
    Owner,
}

impl MemberRole {
    pub fn is_operator(&self) -> bool {
        *self >= MemberRole::Administrator
    }
}

/// Who sent an inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: String,
    pub name: Option<String>,
    pub role: MemberRole,
}

impl Sender {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            role: MemberRole::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: MemberRole) -> Self {
        self.role = role;
        self
    }
}

/// An inbound chat event delivered by the messaging client
#[derive(Debug, Clone)]
pub struct ChatEvent {
    pub id: String,
    pub sender: Sender,
    pub group_id: Option<String>,
    pub message: MessageChain,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
    pub raw: Option<serde_json::Value>,
}

impl ChatEvent {
    pub fn new(sender: Sender, message: impl Into<MessageChain>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            group_id: None,
            message: message.into(),
            timestamp: Utc::now(),
            platform: "unknown".to_string(),
            raw: None,
        }
    }

    /// Shorthand for a private (non-group) text event
    pub fn private(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Sender::new(sender_id), MessageChain::text(text))
    }

    /// Shorthand for a group text event
    pub fn group(group_id: impl Into<String>, sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::private(sender_id, text).in_group(group_id)
    }

    pub fn in_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn is_group(&self) -> bool {
        self.group_id.is_some()
    }

    /// Where replies to this event go: the group if any, else the sender
    pub fn subject(&self) -> &str {
        self.group_id.as_deref().unwrap_or(&self.sender.id)
    }

    pub fn text(&self) -> String {
        self.message.content_to_string()
    }
}
