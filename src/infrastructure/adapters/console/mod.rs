//! Console adapter for local operation and development

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::{ChatEvent, MessageChain};
use crate::domain::traits::{Bot, BotInfo};

/// What a console line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// `chat <text>`: a private chat message from the console user
    Chat(String),
    /// `group <id> <text>`: a group chat message from the console user
    Group { group_id: String, text: String },
    /// `exit` or `quit`
    Exit,
    /// Anything else is a console command
    Command(String),
}

impl ConsoleInput {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if line == "exit" || line == "quit" {
            return Some(ConsoleInput::Exit);
        }
        if let Some(text) = line.strip_prefix("chat ") {
            return Some(ConsoleInput::Chat(text.trim().to_string()));
        }
        if let Some(rest) = line.strip_prefix("group ") {
            let (group_id, text) = rest.trim().split_once(' ')?;
            return Some(ConsoleInput::Group {
                group_id: group_id.to_string(),
                text: text.trim().to_string(),
            });
        }
        Some(ConsoleInput::Command(line.to_string()))
    }
}

/// Console bot adapter: reads stdin, prints replies
pub struct ConsoleAdapter {
    info: BotInfo,
    user_id: String,
}

impl ConsoleAdapter {
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: name.into(),
            },
            user_id: user_id.into(),
        }
    }

    /// Turn one parsed line into output, dispatching it as needed
    pub async fn handle(&self, dispatcher: &MessageDispatcher, input: ConsoleInput) -> Result<Option<String>, BotError> {
        let event = match input {
            ConsoleInput::Exit => return Ok(None),
            ConsoleInput::Command(line) => return Ok(Some(dispatcher.dispatch_console(&line).await)),
            ConsoleInput::Chat(text) => ChatEvent::private(self.user_id.clone(), text),
            ConsoleInput::Group { group_id, text } => ChatEvent::group(group_id, self.user_id.clone(), text),
        }
        .with_platform("console");

        let result = dispatcher.dispatch(&event).await;
        tracing::debug!("[console] {:?}", result);
        if result.has_reply() {
            self.send_message(event.subject(), &result.message).await?;
        }
        Ok(Some(String::new()))
    }

    /// Read lines from stdin until EOF or `exit`
    pub async fn run(&self, dispatcher: Arc<MessageDispatcher>) -> Result<(), BotError> {
        self.start().await?;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            let Some(input) = ConsoleInput::parse(&line) else {
                continue;
            };
            match self.handle(&dispatcher, input).await? {
                None => break,
                Some(output) if !output.is_empty() => println!("{}", output),
                Some(_) => {}
            }
        }

        tracing::info!("Console adapter stopped");
        Ok(())
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot as user {}", self.user_id);
        println!("Type 'chat <text>', 'group <id> <text>' or a console command ('exit' to quit)");
        Ok(())
    }

    async fn send_message(&self, subject: &str, message: &MessageChain) -> Result<(), BotError> {
        println!("[BOT -> {}] {}", subject, message.content_to_string());
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
