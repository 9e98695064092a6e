//! Common test utilities for dispatch integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once, Weak};
use std::time::Duration;

use comet_bot::application::errors::CommandError;
use comet_bot::application::messaging::{CommandParser, ContentFilter, MessageDispatcher};
use comet_bot::application::services::{BotState, CommandRegistry, RegisteredCommand, SessionStore};
use comet_bot::commands;
use comet_bot::domain::entities::{
    ChatEvent, CommandProps, MemberRole, MessageChain, Session, UserLevel, UserRecord,
};
use comet_bot::domain::traits::{ChatCommand, ConsoleCommand};
use comet_bot::infrastructure::cooldown::CooldownTracker;
use comet_bot::infrastructure::group_config::GroupSettingsStore;
use comet_bot::infrastructure::storage::MemoryUserStore;

pub const OWNER: &str = "10001";

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// `kick` - moderation command gated on group role, helpers and permission key
pub struct KickCommand {
    props: CommandProps,
    groups: Arc<GroupSettingsStore>,
    pub kicked: Mutex<Vec<String>>,
}

impl KickCommand {
    pub fn new(groups: Arc<GroupSettingsStore>) -> Self {
        Self {
            props: CommandProps::new("kick")
                .with_aliases(["tr"])
                .with_description("Kick a member")
                .with_permission("bot.commands.kick"),
            groups,
            kicked: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatCommand for KickCommand {
    fn props(&self) -> &CommandProps {
        &self.props
    }

    fn help(&self) -> String {
        "/kick [@member]".to_string()
    }

    fn has_permission(&self, user: &UserRecord, event: &ChatEvent) -> bool {
        if let Some(group_id) = &event.group_id {
            if !event.sender.role.is_operator() {
                return false;
            }
            if self.groups.is_helper(group_id, &user.id) {
                return true;
            }
        }
        user.has_permission(&self.props.permission)
    }

    async fn execute(&self, event: &ChatEvent, args: &[String], _user: &UserRecord) -> Result<MessageChain, CommandError> {
        let target = event
            .message
            .mentions()
            .next()
            .map(str::to_string)
            .or_else(|| args.first().cloned());
        match target {
            Some(target) => {
                self.kicked.lock().unwrap().push(target.clone());
                Ok(MessageChain::text(format!("kicked {}", target)))
            }
            None => Ok(MessageChain::text(self.help())),
        }
    }
}

/// `draw` - opens a persistent session collecting follow-up input
pub struct DrawCommand {
    props: CommandProps,
    sessions: Arc<SessionStore>,
    me: Weak<DrawCommand>,
    pub inputs: Mutex<Vec<String>>,
}

impl DrawCommand {
    pub fn new(sessions: Arc<SessionStore>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            props: CommandProps::new("draw").with_level(UserLevel::Guest),
            sessions,
            me: me.clone(),
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCommand for DrawCommand {
    fn props(&self) -> &CommandProps {
        &self.props
    }

    async fn execute(&self, event: &ChatEvent, _args: &[String], _user: &UserRecord) -> Result<MessageChain, CommandError> {
        let me = self
            .me
            .upgrade()
            .ok_or_else(|| CommandError::ExecutionFailed("draw command dropped".into()))?;
        self.sessions
            .put(Session::persistent(me).with_member(event.sender.id.clone()));
        Ok(MessageChain::text("Send me what to draw"))
    }

    fn can_handle_continued_input(&self) -> bool {
        true
    }

    async fn handle_input(&self, event: &ChatEvent, _user: &UserRecord, _session: &Session) -> Result<(), CommandError> {
        self.inputs.lock().unwrap().push(event.text());
        Ok(())
    }
}

/// Owner of transient group sessions; counts inputs and expiry hooks
pub struct QuizCommand {
    props: CommandProps,
    pub inputs: Mutex<Vec<String>>,
    pub expired: AtomicUsize,
}

impl QuizCommand {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            props: CommandProps::new("quiz"),
            inputs: Mutex::new(Vec::new()),
            expired: AtomicUsize::new(0),
        })
    }

    pub fn expired(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCommand for QuizCommand {
    fn props(&self) -> &CommandProps {
        &self.props
    }

    async fn execute(&self, _event: &ChatEvent, _args: &[String], _user: &UserRecord) -> Result<MessageChain, CommandError> {
        Ok(MessageChain::text("Question 1"))
    }

    fn can_handle_continued_input(&self) -> bool {
        true
    }

    async fn handle_input(&self, event: &ChatEvent, _user: &UserRecord, _session: &Session) -> Result<(), CommandError> {
        self.inputs.lock().unwrap().push(event.text());
        Ok(())
    }

    async fn before_session_expired(&self, _session: &Session) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}

/// `echo` - replies with its arguments
pub struct EchoCommand {
    props: CommandProps,
    pub calls: AtomicUsize,
}

impl EchoCommand {
    pub fn new() -> Self {
        Self {
            props: CommandProps::new("echo").with_level(UserLevel::Guest),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ChatCommand for EchoCommand {
    fn props(&self) -> &CommandProps {
        &self.props
    }

    async fn execute(&self, _event: &ChatEvent, args: &[String], _user: &UserRecord) -> Result<MessageChain, CommandError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(MessageChain::text(args.join(" ")))
    }
}

/// Chat command that always fails with the given error
pub struct FailingCommand {
    props: CommandProps,
    make_error: fn() -> CommandError,
}

impl FailingCommand {
    pub fn new(name: &str, make_error: fn() -> CommandError) -> Self {
        Self {
            props: CommandProps::new(name).with_level(UserLevel::Guest),
            make_error,
        }
    }
}

#[async_trait]
impl ChatCommand for FailingCommand {
    fn props(&self) -> &CommandProps {
        &self.props
    }

    async fn execute(&self, _event: &ChatEvent, _args: &[String], _user: &UserRecord) -> Result<MessageChain, CommandError> {
        Err((self.make_error)())
    }
}

/// Console command that always fails
pub struct BrokenConsoleCommand {
    props: CommandProps,
}

impl BrokenConsoleCommand {
    pub fn new() -> Self {
        Self {
            props: CommandProps::new("broadcast").with_aliases(["bc"]),
        }
    }
}

#[async_trait]
impl ConsoleCommand for BrokenConsoleCommand {
    fn props(&self) -> &CommandProps {
        &self.props
    }

    async fn execute(&self, args: &[String]) -> Result<String, CommandError> {
        Err(CommandError::InvalidArgs(format!("no group for {:?}", args)))
    }
}

/// A fully wired dispatcher plus handles on its collaborators
pub struct Harness {
    pub dispatcher: Arc<MessageDispatcher>,
    pub registry: Arc<CommandRegistry>,
    pub sessions: Arc<SessionStore>,
    pub users: Arc<MemoryUserStore>,
    pub groups: Arc<GroupSettingsStore>,
    pub state: Arc<BotState>,
    pub kick: Arc<KickCommand>,
    pub draw: Arc<DrawCommand>,
    pub echo: Arc<EchoCommand>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_filter(Vec::<String>::new())
    }

    pub fn with_filter(words: Vec<impl AsRef<str>>) -> Self {
        ensure_init();

        let sessions = Arc::new(SessionStore::default());
        let registry = Arc::new(CommandRegistry::new());
        let state = Arc::new(BotState::default());
        let groups = Arc::new(GroupSettingsStore::new());
        let users = Arc::new(MemoryUserStore::new());

        commands::register_defaults(&registry, state.clone(), sessions.clone(), "comet-bot", "debug");

        let kick = Arc::new(KickCommand::new(groups.clone()));
        let draw = DrawCommand::new(sessions.clone());
        let echo = Arc::new(EchoCommand::new());
        registry.register(RegisteredCommand::Chat(kick.clone()));
        registry.register(RegisteredCommand::Chat(draw.clone()));
        registry.register(RegisteredCommand::Chat(echo.clone()));
        registry.register(RegisteredCommand::chat(FailingCommand::new("fail", || {
            CommandError::ExecutionFailed("database exploded".into())
        })));
        registry.register(RegisteredCommand::chat(FailingCommand::new("fetch", || {
            CommandError::Timeout("api.example.com".into())
        })));
        registry.register(RegisteredCommand::console(BrokenConsoleCommand::new()));

        let dispatcher = MessageDispatcher::new(
            registry.clone(),
            sessions.clone(),
            users.clone(),
            Arc::new(CooldownTracker::new(Duration::from_secs(5))),
            groups.clone(),
        )
        .with_parser(CommandParser::new(["!", "/"]))
        .with_filter(ContentFilter::new(words))
        .with_state(state.clone());

        Self {
            dispatcher: Arc::new(dispatcher),
            registry,
            sessions,
            users,
            groups,
            state,
            kick,
            draw,
            echo,
        }
    }

    pub async fn add_owner(&self, id: &str) {
        self.users
            .save_user(UserRecord::new(id).with_level(UserLevel::Owner))
            .await;
    }
}

pub fn operator_event(group_id: &str, sender_id: &str, text: &str) -> ChatEvent {
    let mut event = ChatEvent::group(group_id, sender_id, text);
    event.sender.role = MemberRole::Administrator;
    event
}

pub fn text_of(chain: &MessageChain) -> String {
    chain.content_to_string()
}
