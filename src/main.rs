use clap::{Parser, Subcommand};
use std::sync::Arc;

use comet_bot::application::errors::BotError;
use comet_bot::application::messaging::{CommandParser, ContentFilter, MessageDispatcher};
use comet_bot::application::services::{BotState, CommandRegistry, SessionStore};
use comet_bot::commands;
use comet_bot::infrastructure::adapters::ConsoleAdapter;
use comet_bot::infrastructure::config::Config;
use comet_bot::infrastructure::cooldown::CooldownTracker;
use comet_bot::infrastructure::group_config::GroupSettingsStore;
use comet_bot::infrastructure::storage::MemoryUserStore;

#[derive(Parser)]
#[command(name = "comet-bot")]
#[command(about = "Chat command dispatcher with session handling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console adapter
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run => run_bot(&cli.config),
        Commands::Version => {
            println!("comet-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
    };

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

fn run_bot(config_path: &str) -> Result<(), BotError> {
    let config = load_config(config_path);
    if !config.console_enabled() {
        tracing::warn!("No adapter enabled, nothing to run");
        return Ok(());
    }
    tracing::info!("Starting {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let state = Arc::new(BotState::new(config.bot.enabled));
        let sessions = Arc::new(SessionStore::new(
            config.sessions.idle_threshold(),
            config.sessions.sweep_interval(),
        ));
        sessions.spawn_sweeper();

        let registry = Arc::new(CommandRegistry::new());
        let registered = commands::register_defaults(
            &registry,
            state.clone(),
            sessions.clone(),
            &config.bot.name,
            &config.bot.diagnostic_command,
        );
        tracing::info!("Registered {} command(s)", registered);

        let dispatcher = MessageDispatcher::new(
            registry,
            sessions.clone(),
            Arc::new(MemoryUserStore::from_config(&config.users)),
            Arc::new(CooldownTracker::new(config.cooldown.window())),
            Arc::new(GroupSettingsStore::from_config(&config.groups)),
        )
        .with_parser(CommandParser::new(config.bot.prefixes.iter().cloned()))
        .with_filter(ContentFilter::new(&config.filter.words))
        .with_state(state)
        .with_diagnostic_command(config.bot.diagnostic_command.clone());

        let adapter = ConsoleAdapter::new(config.bot.name.clone(), config.console_user_id());
        let outcome = adapter.run(Arc::new(dispatcher)).await;
        sessions.shutdown();
        outcome
    })
}

fn init_config(config_path: &str) -> Result<(), BotError> {
    if std::path::Path::new(config_path).exists() {
        println!("{} already exists, leaving it untouched", config_path);
        return Ok(());
    }
    let yaml = Config::default().to_yaml()?;
    std::fs::write(config_path, yaml)?;
    println!("Default config written to {}", config_path);
    Ok(())
}
