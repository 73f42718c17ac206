//! Docstate CLI - document processing-state server

use clap::Parser;
use docstate::config::expand_path;
use docstate::{Config, Core};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "docstate")]
#[command(author = "Docstate Team")]
#[command(version)]
#[command(about = "Docstate - tracks which pipeline stage each document is in", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.docstate/config.toml")]
    config: PathBuf,

    /// Override server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override server host
    #[arg(long)]
    host: Option<String>,

    /// Override the state table name
    #[arg(long)]
    table: Option<String>,

    /// Handle a single event (JSON argument, or stdin when omitted) and exit
    #[arg(long, value_name = "EVENT", num_args = 0..=1)]
    invoke: Option<Option<String>>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initialize a new config file with defaults
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so --invoke output stays clean on stdout
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("docstate={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = expand_path(&args.config);

    // Handle --init flag
    if args.init {
        if config_path.exists() {
            tracing::warn!("Config file already exists: {}", config_path.display());
            return Ok(());
        }
        Config::create_default(&config_path)?;
        tracing::info!("Created default config at: {}", config_path.display());
        return Ok(());
    }

    // Load configuration
    let mut config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        tracing::warn!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        Config::default()
    };

    config.apply_env_overrides();

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(table) = args.table {
        config.store.table = Some(table);
    }

    let core = Core::new(config)?;

    if let Some(event) = args.invoke {
        let raw = match event {
            Some(raw) => raw,
            None => {
                let mut raw = String::new();
                tokio::io::stdin().read_to_string(&mut raw).await?;
                raw
            }
        };
        let response = core.invoke(&raw).await;
        println!("{}", response.to_envelope());
        return Ok(());
    }

    tracing::info!("Starting HTTP server mode");
    core.start_api_server().await?;

    Ok(())
}
