//! Graph Gateway - Main Server
//!
//! REST façade over Neo4j with a WebM → MP4 upload endpoint.

use anyhow::Result;
use clap::{Parser, Subcommand};
use graph_gateway::{neo4j::Neo4jClient, Config};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "graph-gateway")]
#[command(about = "REST gateway over a Neo4j graph")]
struct Cli {
    /// Path to a YAML config file (default: ./config.yaml)
    #[arg(short, long, global = true, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Check connectivity to Neo4j and exit
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,graph_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            if let Some(host) = host {
                config.server_host = host;
            }
            graph_gateway::start_server(config).await
        }
        Commands::Ping => run_ping(config).await,
    }
}

async fn run_ping(config: Config) -> Result<()> {
    let client =
        Neo4jClient::new(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password).await?;
    let outcome = client.test_connection().await;
    client.close().await;

    match outcome {
        Ok(message) => {
            tracing::info!("{} ({})", message, config.neo4j_uri);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Neo4j connection failed: {}", e)),
    }
}
