//! Pattern Vault
//!
//! A personal knowledge service built on the PARA method:
//! - Notes filed under Projects, Areas or Resources (or implicitly archived)
//! - Directed, weighted connections between notes
//! - A deterministic daily reflection prompt with optional note promotion
//! - Neo4j persistence, with an in-memory backend for tests and local runs

pub mod api;
pub mod auth;
pub mod error;
pub mod notes;
pub mod para;
pub mod prompts;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub store: StoreYamlConfig,
    pub neo4j: Neo4jYamlConfig,
    pub prompts: PromptsYamlConfig,
    /// Auth section; if absent, auth_config will be None (deny-by-default)
    pub auth: Option<AuthConfig>,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Which persistence backend to run against
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Neo4j,
    /// Process-local, lost on restart
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neo4j => write!(f, "neo4j"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neo4j" => Ok(Self::Neo4j),
            "memory" => Ok(Self::Memory),
            _ => Err(format!("Unknown store backend: {}", s)),
        }
    }
}

/// Store configuration section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StoreYamlConfig {
    pub backend: StoreBackend,
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
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "vault-password".into(),
        }
    }
}

/// Daily prompt configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptsYamlConfig {
    /// Copy each answered prompt into a JOURNAL note
    pub promote_to_note: bool,
}

impl Default for PromptsYamlConfig {
    fn default() -> Self {
        Self {
            promote_to_note: true,
        }
    }
}

/// Authentication configuration.
///
/// No `auth` section in YAML → `auth_config = None` → every protected route
/// answers 403.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret (HS256, minimum 32 characters)
    pub jwt_secret: String,
    /// JWT token lifetime in seconds (default: 28800 = 8h)
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_secs: u64,
    /// Optional domain restriction (e.g. "example.com")
    pub allowed_email_domain: Option<String>,
    /// Allow new user registration via POST /auth/register (default: false)
    #[serde(default)]
    pub allow_registration: bool,
}

fn default_jwt_expiry() -> u64 {
    28800 // 8 hours
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub store_backend: StoreBackend,
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub promote_reflections: bool,
    /// Auth config; None means deny-by-default (no auth section in YAML)
    pub auth_config: Option<AuthConfig>,
}

impl Config {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let store_backend = match std::env::var("VAULT_STORE") {
            Ok(raw) => raw.parse().map_err(anyhow::Error::msg)?,
            Err(_) => yaml.store.backend,
        };

        Ok(Self {
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            store_backend,
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            promote_reflections: std::env::var("VAULT_PROMOTE_REFLECTIONS")
                .ok()
                .and_then(|s| parse_flag(&s))
                .unwrap_or(yaml.prompts.promote_to_note),
            auth_config: yaml.auth,
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
}

/// Parse a boolean env value (`true/false`, `1/0`, `yes/no`, `on/off`)
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn store::VaultStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state with the configured store backend
    pub async fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn store::VaultStore> = match config.store_backend {
            StoreBackend::Neo4j => Arc::new(
                store::Neo4jClient::new(
                    &config.neo4j_uri,
                    &config.neo4j_user,
                    &config.neo4j_password,
                )
                .await?,
            ),
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory store: data is lost on restart");
                Arc::new(store::InMemoryStore::new())
            }
        };

        Ok(Self {
            store,
            config: Arc::new(config),
        })
    }

    /// State over an existing store
    pub fn with_store(store: Arc<dyn store::VaultStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Connect the store, build the router and serve until Ctrl-C.
pub async fn start_server(config: Config) -> Result<()> {
    let port = config.server_port;
    let backend = config.store_backend;
    let state = AppState::new(config).await?;
    tracing::info!(backend = %backend, "Store ready");

    if state.config.auth_config.is_none() {
        tracing::warn!("No auth section configured: every protected route will answer 403");
    }

    let router = api::create_router(Arc::new(api::ServerState::new(&state)));
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Pattern Vault listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        })
        .await
        .context("Server error")
}

// ============================================================================
// Tests
// ============================================================================
