//! Configuration types, defaults, loading, and validation.

use super::secrets::SecretString;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
///
/// Built once at startup and handed to the components that need it; nothing
/// reads process state after that.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Generative-language API configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Session store configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Files read while loading, in order
    #[serde(skip)]
    pub sources: Vec<PathBuf>,

    /// Problems noticed while loading. Logging is not set up yet at that
    /// point, so the caller reports them.
    #[serde(skip)]
    pub load_warnings: Vec<String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: "127.0.0.1")
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// The single browser origin allowed by CORS (default: "http://localhost:3000")
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_allowed_origin() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

/// Gemini `generateContent` configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key, normally supplied through `GEMINI_API_KEY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// Models collection URL; the request goes to `{base_url}/{model}:generateContent`
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Ask the model for `application/json` output on feedback requests
    #[serde(default)]
    pub json_mode: bool,

    /// Overall request timeout. Unset keeps the HTTP client's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            json_mode: false,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite session store
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    debate_coach_home().join("sessions.db")
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write a daily-rolling log file at this path
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Emit JSON lines instead of the human format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Expand leading `~` or `~/` in a path to the actual home directory.
fn expand_tilde(p: &Path) -> PathBuf {
    if let Ok(rest) = p.strip_prefix("~") {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest)
    } else {
        p.to_path_buf()
    }
}

/// Base directory for config and data: `~/.debate-coach/`
pub fn debate_coach_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".debate-coach")
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. System config: ~/.debate-coach/config.toml
    /// 3. Local config: ./debate-coach.toml
    /// 4. Environment variables
    pub fn load() -> Result<Self> {
        let mut config = Self::default();
        let mut sources = Vec::new();

        let system_config_path = Self::system_config_path();
        if system_config_path.exists() {
            config = Self::read_file(&system_config_path)?;
            sources.push(system_config_path);
        }

        let local_config_path = Self::local_config_path();
        if local_config_path.exists() {
            config = Self::read_file(&local_config_path)?;
            sources.push(local_config_path);
        }

        config.sources = sources;
        config.apply_env_overrides(|var| std::env::var(var).ok());
        config.database.path = expand_tilde(&config.database.path);
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }
        let mut config = Self::read_file(path)?;
        config.sources = vec![path.to_path_buf()];

        config.apply_env_overrides(|var| std::env::var(var).ok());
        config.database.path = expand_tilde(&config.database.path);

        Ok(config)
    }

    /// Replay what happened during loading once a subscriber is installed.
    pub fn log_load_report(&self) {
        if self.sources.is_empty() {
            tracing::debug!("No config file found, using defaults and environment");
        }
        for source in &self.sources {
            tracing::debug!("Loaded config from {:?}", source);
        }
        for warning in &self.load_warnings {
            tracing::warn!("{}", warning);
        }
    }

    pub fn system_config_path() -> PathBuf {
        debate_coach_home().join("config.toml")
    }

    fn local_config_path() -> PathBuf {
        PathBuf::from("./debate-coach.toml")
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply environment variable overrides.
    ///
    /// `lookup` is injected so tests do not have to mutate the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").map(SecretString::new)
            && !key.is_empty()
        {
            self.gemini.api_key = Some(key);
        }

        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => self
                    .load_warnings
                    .push(format!("Ignoring invalid PORT value: {}", port)),
            }
        }

        if let Some(bind) = lookup("DEBATE_COACH_BIND") {
            self.server.bind = bind;
        }

        if let Some(origin) = lookup("DEBATE_COACH_ALLOWED_ORIGIN") {
            self.server.allowed_origin = origin;
        }

        if let Some(model) = lookup("DEBATE_COACH_GEMINI_MODEL") {
            self.gemini.model = model;
        }

        if let Some(db_path) = lookup("DEBATE_COACH_DB_PATH") {
            self.database.path = PathBuf::from(db_path);
        }

        if let Some(log_level) = lookup("DEBATE_COACH_LOG_LEVEL") {
            self.logging.level = log_level;
        }

        if let Some(log_file) = lookup("DEBATE_COACH_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(log_file));
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.gemini.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be non-zero");
        }

        if self.server.allowed_origin.trim().is_empty() {
            anyhow::bail!("server.allowed_origin is empty");
        }

        if self.gemini.base_url.trim().is_empty() || self.gemini.model.trim().is_empty() {
            anyhow::bail!("gemini.base_url and gemini.model must be set");
        }

        Ok(())
    }

    /// Save configuration to a file. The API key is never written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(&self.without_secrets()).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Configuration saved to: {:?}", path);
        Ok(())
    }

    fn without_secrets(&self) -> Self {
        let mut copy = self.clone();
        copy.gemini.api_key = None;
        copy
    }
}
