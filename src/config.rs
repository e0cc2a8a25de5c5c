//! Configuration types and loading

use eyre::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Project-local config file name.
const LOCAL_CONFIG: &str = ".ticksync.yml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which server to talk to
    pub server: ServerConfig,

    /// Credentials
    pub auth: AuthConfig,
}

impl Config {
    /// Check that credentials are available before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.auth.username.is_empty() {
            return Err(eyre::eyre!("No username configured. Set auth.username in the config file."));
        }
        if std::env::var(&self.auth.password_env).is_err() {
            return Err(eyre::eyre!(
                "Password not found. Set the {} environment variable.",
                self.auth.password_env
            ));
        }
        self.server.base_url().map(|_| ())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        Self::load_with(config_path, Path::new("."), dirs::config_dir().as_deref())
    }

    /// Fallback chain over explicit search roots: the explicit path, then
    /// `<local_dir>/.ticksync.yml`, then `<config_dir>/ticksync/ticksync.yml`,
    /// then defaults. Unreadable fallback files are skipped with a warning.
    fn load_with(config_path: Option<&PathBuf>, local_dir: &Path, config_dir: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = local_dir.join(LOCAL_CONFIG);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // ~/.config/ticksync/ticksync.yml
        if let Some(config_dir) = config_dir {
            let user_config = config_dir.join("ticksync").join("ticksync.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Password read from the configured environment variable.
    pub fn password(&self) -> Result<String> {
        std::env::var(&self.auth.password_env)
            .context(format!("Failed to read password from {}", self.auth.password_env))
    }
}

/// Known service deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Server {
    Dida365,
    TickTick,
}

impl Server {
    /// API root for this deployment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Server::Dida365 => "https://api.dida365.com/api/v2",
            Server::TickTick => "https://api.ticktick.com/api/v2",
        }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Server::Dida365 => write!(f, "dida365"),
            Server::TickTick => write!(f, "ticktick"),
        }
    }
}

impl FromStr for Server {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dida365" | "dida" => Ok(Server::Dida365),
            "ticktick" => Ok(Server::TickTick),
            other => Err(eyre::eyre!("unknown server '{}', expected dida365 or ticktick", other)),
        }
    }
}

/// Server connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name: dida365 or ticktick
    pub name: String,

    /// Explicit API root, overrides `name`
    #[serde(rename = "base-url", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: Server::Dida365.to_string(),
            base_url: None,
            timeout_ms: 30_000,
            user_agent: format!("ticksync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ServerConfig {
    /// Resolve the API root, preferring the explicit override.
    pub fn base_url(&self) -> Result<String> {
        if let Some(url) = &self.base_url {
            return Ok(url.clone());
        }
        let server: Server = self.name.parse()?;
        Ok(server.base_url().to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,

    /// Environment variable holding the password
    #[serde(rename = "password-env")]
    pub password_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password_env: "TICKSYNC_PASSWORD".to_string(),
        }
    }
}
