//! Graph Gateway
//!
//! A REST façade over a Neo4j graph database with:
//! - Parameterized Cypher for node/relationship creation and lookup
//! - Allow-list validation of labels and relationship types
//! - Graph slices for visualization and user-linked goals/metrics
//! - WebM → MP4 transcoding of webcam uploads through ffmpeg

pub mod api;
pub mod graph;
pub mod media;
pub mod neo4j;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub neo4j: Neo4jYamlConfig,
    pub media: MediaYamlConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            cors_origins: vec!["http://localhost:5173".into()],
        }
    }
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "neo4j://localhost:7687".into(),
            user: "neo4j".into(),
            password: "password".into(),
        }
    }
}

/// Video upload / transcoding section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaYamlConfig {
    pub output_dir: String,
    pub ffmpeg_path: String,
    pub max_upload_bytes: usize,
}

impl Default for MediaYamlConfig {
    fn default() -> Self {
        Self {
            output_dir: "data/webcam_video_output".into(),
            ffmpeg_path: "ffmpeg".into(),
            max_upload_bytes: 512 * 1024 * 1024,
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub server_host: String,
    pub server_port: u16,
    /// Origins allowed to make credentialed cross-origin requests
    pub cors_origins: Vec<String>,
    pub video_output_dir: PathBuf,
    pub ffmpeg_path: String,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        // 1. Load YAML config (or defaults if file not found)
        let yaml = Self::load_yaml(yaml_path);

        // 2. Build Config with env var overrides
        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER")
                .or_else(|_| std::env::var("NEO4J_USERNAME"))
                .unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            server_host: std::env::var("SERVER_HOST").unwrap_or(yaml.server.host),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| parse_origins(&s))
                .unwrap_or(yaml.server.cors_origins),
            video_output_dir: std::env::var("VIDEO_OUTPUT_DIR")
                .unwrap_or(yaml.media.output_dir)
                .into(),
            ffmpeg_path: std::env::var("FFMPEG_PATH").unwrap_or(yaml.media.ffmpeg_path),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.media.max_upload_bytes),
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }

    /// `host:port` the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Comma-separated origin list; blanks dropped
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ============================================================================
// Application state
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<graph::GraphManager>,
    pub media: Arc<media::VideoConverter>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state with all services initialized
    pub async fn new(config: Config) -> Result<Self> {
        let store = Arc::new(
            neo4j::Neo4jClient::new(
                &config.neo4j_uri,
                &config.neo4j_user,
                &config.neo4j_password,
            )
            .await?,
        );

        let media = Arc::new(media::VideoConverter::new(
            config.video_output_dir.clone(),
            Arc::new(media::FfmpegTranscoder::new(&config.ffmpeg_path)),
        ));

        Ok(Self {
            graph: Arc::new(graph::GraphManager::new(store)),
            media,
            config: Arc::new(config),
        })
    }
}

// ============================================================================
// Server
// ============================================================================

/// Connect to the store, serve HTTP until Ctrl-C, then close the store
pub async fn start_server(config: Config) -> Result<()> {
    let addr = config.bind_addr();
    let state = AppState::new(config).await?;
    state.media.prepare().await?;
    tracing::info!(
        "Videos will be written to {}",
        state.media.output_dir().display()
    );

    let app = api::create_router(state.clone());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Graph gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.graph.close().await;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
    }
}

// ============================================================================
// Tests
// ============================================================================
