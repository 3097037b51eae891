use clap::{Parser, Subcommand};
use std::sync::Arc;

mod domain;
mod application;
mod infrastructure;

use application::services::{CommandService, MessageService};
use domain::entities::Message;
use domain::traits::{Bot, Store};
use infrastructure::adapters::console::ConsoleAdapter;
use infrastructure::adapters::line::LineAdapter;
use infrastructure::config::Config;
use infrastructure::loader::CsvLoader;
use infrastructure::server;
use infrastructure::storage::MemoryStore;

#[derive(Parser)]
#[command(name = "drink-bot")]
#[command(about = "Drink catalog chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Listen port (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the webhook
    Run,
    /// Talk to the bot on stdin/stdout
    Console,
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

    match cli.command {
        Commands::Run => {
            let config = load_config(&cli.config, cli.port);
            run_runtime(run_webhook(config));
        }
        Commands::Console => {
            let config = load_config(&cli.config, cli.port);
            run_runtime(run_console(config));
        }
        Commands::Version => {
            println!("drink-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn fatal(message: impl std::fmt::Display) -> ! {
    tracing::error!("{}", message);
    std::process::exit(1);
}

fn load_config(path: &str, port_override: Option<u16>) -> Config {
    let mut config = Config::resolve(path).unwrap_or_else(|e| fatal(e));
    if let Some(port) = port_override {
        config.server.port = port;
    }
    config
}

fn run_runtime<F: std::future::Future<Output = ()>>(future: F) {
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| fatal(e));
    rt.block_on(future);
}

/// Seeded store plus whatever the bootstrap file provides
async fn build_catalog(config: &Config) -> CommandService<MemoryStore> {
    let store = MemoryStore::new(config.catalog.seed.record());
    CsvLoader::from_config(&config.catalog).bootstrap(&store).await;

    CommandService::new(store).with_recent_limit(config.catalog.recent_limit)
}

async fn run_webhook(config: Config) {
    tracing::info!("Starting {}", config.bot.name);

    let (channel_secret, channel_token) = config.credentials().unwrap_or_else(|e| fatal(e));
    let addr = config.bind_addr().unwrap_or_else(|e| fatal(e));

    let mut bot = LineAdapter::new(channel_token).with_api_base(&config.line.api_base);
    if let Err(e) = bot.fetch_bot_info().await {
        fatal(format!("Failed to fetch bot info: {}", e));
    }
    if let Err(e) = bot.start().await {
        fatal(format!("Failed to start bot: {}", e));
    }

    let commands = build_catalog(&config).await;
    let service = Arc::new(MessageService::new(bot, commands));
    tracing::info!("Catalog ready: {} drinks", service.commands().store().len().await);
    let info = service.bot().bot_info();
    tracing::info!("Bot started: {} (@{}, {})", info.name, info.username, info.id);

    let app = server::router(service, &channel_secret, &config.server.callback_path);
    if let Err(e) = server::serve(addr, app).await {
        fatal(e);
    }
}

async fn run_console(config: Config) {
    let bot = ConsoleAdapter::new();
    if let Err(e) = bot.start().await {
        fatal(format!("Failed to start bot: {}", e));
    }

    let commands = build_catalog(&config).await;
    let service = MessageService::new(bot, commands);
    tracing::info!("Catalog ready: {} drinks", service.commands().store().len().await);

    while let Some(input) = service.bot().read_line("> ").await {
        if input.is_empty() {
            continue;
        }
        let message = Message::from_text("console", input).with_platform("console");
        if let Err(e) = service.handle(message).await {
            tracing::error!("{}", e);
        }
    }
}

fn init_config() {
    match serde_yaml::to_string(&Config::default()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => fatal(e),
    }
}
