use anyhow::Result;
use clap::{Parser, Subcommand};
use clip_search_bot::{setup_observability, BotConfig, GatewayConfig, GatewayServer, UpdateListener};

#[derive(Debug, Parser)]
#[command(name = "clip-search-bot")]
#[command(about = "Text-to-image search backed by a CLIP space, served over HTTP and telegram", long_about = None)]
struct Cli {
    /// config file, the extension is optional
    #[arg(long = "config", env = "CLIP_SEARCH_CONFIG_FILE_PATH", default_value = "./config")]
    config_file_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// serve the HTTP search gateway
    Gateway,
    /// run the telegram front end
    Bot,
}

async fn init() -> Result<()> {
    setup_observability()?;

    let Cli {
        config_file_path,
        command,
    } = Cli::parse();

    match command {
        Commands::Gateway => {
            let config = GatewayConfig::load(&config_file_path)?;
            serve_gateway_command(config).await
        }
        Commands::Bot => {
            let config = BotConfig::load(&config_file_path)?;
            serve_bot_command(config).await
        }
    }
}

async fn serve_gateway_command(config: GatewayConfig) -> Result<()> {
    let server = GatewayServer::initialize(config)?;
    let result = server.run().await;
    server.shutdown().await;
    result
}

async fn serve_bot_command(config: BotConfig) -> Result<()> {
    let update_listener = UpdateListener::initialize(config)?;
    let result = update_listener.run().await;
    update_listener.shutdown().await;
    result
}

fn main() -> Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(init())
}
