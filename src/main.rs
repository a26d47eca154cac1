use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use give_me_title::application::errors::BotError;
use give_me_title::application::messaging::MessageDispatcher;
use give_me_title::application::services::GroupCommandHandler;
use give_me_title::domain::traits::{Bot, StateStore};
use give_me_title::infrastructure::adapters::{ConsoleAdapter, OneBotAdapter};
use give_me_title::infrastructure::config::{ActiveAdapter, Config, StorageBackend};
use give_me_title::infrastructure::database::SqliteStore;
use give_me_title::infrastructure::storage::JsonStore;

#[derive(Parser)]
#[command(name = "give-me-title")]
#[command(about = "Group chat bot that assigns special titles on request", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot, reading one OneBot event per line from stdin
    Run,
    /// Show the stored feature flag of a group
    Status {
        group_id: String,
    },
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

    let result = match cli.command {
        Commands::Run => block_on(run_bot(load_config(&cli.config))),
        Commands::Status { group_id } => block_on(show_status(load_config(&cli.config), group_id)),
        Commands::Version => {
            println!("give-me-title v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn block_on<F>(future: F) -> Result<(), BotError>
where
    F: std::future::Future<Output = Result<(), BotError>>,
{
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(future)
}

fn load_config(path: &str) -> Config {
    if std::path::Path::new(path).exists() {
        match Config::load(path) {
            Ok(config) => config.with_env(),
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Config::load_env()
            }
        }
    } else {
        Config::load_env()
    }
}

async fn open_store(config: &Config) -> Result<Arc<dyn StateStore>, BotError> {
    let store: Arc<dyn StateStore> = match config.storage.backend {
        StorageBackend::Sqlite => Arc::new(SqliteStore::new(&config.storage.path)?),
        StorageBackend::Json => Arc::new(JsonStore::open(&config.storage.path).await?),
    };
    tracing::info!("Storage opened: {:?} at {}", config.storage.backend, config.storage.path.display());
    Ok(store)
}

fn select_adapter(config: &Config) -> Result<Arc<dyn Bot>, BotError> {
    let bot: Arc<dyn Bot> = match config.active_adapter()? {
        ActiveAdapter::OneBot(onebot) => Arc::new(OneBotAdapter::new(&onebot.base_url, onebot.access_token)),
        ActiveAdapter::Console => Arc::new(ConsoleAdapter::new()),
    };
    Ok(bot)
}

async fn run_bot(config: Config) -> Result<(), BotError> {
    tracing::info!("Starting {}", config.bot.name);

    let bot = select_adapter(&config)?;
    let store = open_store(&config).await?;
    for user_id in &config.operators {
        store.add_operator(user_id).await?;
    }

    let info = bot.bot_info();
    tracing::info!("Adapter: {} ({})", info.name, info.platform);

    let handler = GroupCommandHandler::new(store, bot, config.groups.iter().cloned())
        .with_max_title_length(config.title.max_length);
    let dispatcher = Arc::new(MessageDispatcher::new(&config.bot.switch_command, Arc::new(handler)));

    let mut tasks = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.map_err(|e| BotError::Internal(e.to_string()))? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        while tasks.try_join_next().is_some() {}

        let dispatcher = dispatcher.clone();
        tasks.spawn(async move {
            match dispatcher.process_line(&line).await {
                Ok(Some(outcome)) => tracing::debug!("Handled: {:?}", outcome),
                Ok(None) => {}
                Err(e) => tracing::warn!("Skipping event: {}", e),
            }
        });
    }

    tracing::info!("Input closed, waiting for {} in-flight message(s)", tasks.len());
    while tasks.join_next().await.is_some() {}
    Ok(())
}

async fn show_status(config: Config, group_id: String) -> Result<(), BotError> {
    let store = open_store(&config).await?;
    let enabled = store.load_feature_status(&group_id).await?;
    println!("{}: {}", group_id, if enabled { "enabled" } else { "disabled" });
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
