//! CLI command implementations.

use super::{DbCommands, render};
use crate::coach::Coach;
use crate::config::Config;
use crate::db::{Database, SessionRepository};
use crate::llm::GeminiGateway;
use crate::stats::{self, Comparison, DashboardSummary, ProfileSummary};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Load configuration from `path` or the default locations, then validate it.
pub(super) fn load_config(path: Option<&str>) -> Result<Config> {
    let config = match path {
        Some(p) => Config::load_from_path(p)?,
        None => Config::load()?,
    };
    config.validate()?;
    Ok(config)
}

/// Open the session store, creating and migrating it if needed.
pub(super) async fn open_repository(config: &Config) -> Result<SessionRepository> {
    let path = &config.database.path;
    let db = Database::connect(path)
        .await
        .with_context(|| format!("Failed to open session store at {:?}", path))?;
    db.run_migrations()
        .await
        .context("Failed to run database migrations")?;
    Ok(SessionRepository::new(db))
}

/// Wire up the coach with the Gemini gateway and the session store.
pub(super) async fn build_coach(config: &Config) -> Result<Arc<Coach>> {
    let gateway = GeminiGateway::new(&config.gemini)
        .context("Set GEMINI_API_KEY or gemini.api_key in the config file")?;
    tracing::info!("Using Gemini endpoint {}", gateway.endpoint());
    let sessions = open_repository(config).await?;
    Ok(Arc::new(Coach::new(
        Arc::new(gateway),
        sessions,
        config.gemini.json_mode,
    )))
}

pub(super) async fn cmd_serve(mut config: Config, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    let coach = build_coach(&config).await?;
    crate::server::start_server(&config.server, coach).await
}

pub(super) fn cmd_topics() -> Result<()> {
    print!("{}", render::topics(stats::topics::catalog()));
    Ok(())
}

pub(super) async fn cmd_sessions(config: &Config, email: &str) -> Result<()> {
    let repo = open_repository(config).await?;
    let mut sessions = repo.query_by_email(email).await?;
    stats::sort_newest_first(&mut sessions);
    print!("{}", render::session_list(&sessions));
    Ok(())
}

pub(super) async fn cmd_show(config: &Config, id: &str) -> Result<()> {
    let repo = open_repository(config).await?;
    let session = repo
        .get(id)
        .await?
        .with_context(|| format!("Session not found: {}", id))?;
    print!("{}", render::session_detail(&session));
    Ok(())
}

pub(super) async fn cmd_compare(config: &Config, id: &str) -> Result<()> {
    let repo = open_repository(config).await?;
    let selected = repo
        .get(id)
        .await?
        .with_context(|| format!("Session not found: {}", id))?;
    let sessions = repo.query_by_email(&selected.user.email).await?;

    match Comparison::resolve(&selected.id, sessions) {
        Some(comparison) => print!("{}", render::comparison(&comparison)),
        None => println!("You need at least two sessions to compare progress."),
    }
    Ok(())
}

pub(super) async fn cmd_dashboard(config: &Config, email: &str) -> Result<()> {
    let repo = open_repository(config).await?;
    let sessions = repo.query_by_email(email).await?;
    let summary = DashboardSummary::from_sessions(sessions, chrono::Utc::now());
    print!("{}", render::dashboard(&summary));
    Ok(())
}

pub(super) async fn cmd_profile(config: &Config, email: &str) -> Result<()> {
    let repo = open_repository(config).await?;
    let sessions = repo.query_by_email(email).await?;
    let profile = ProfileSummary::from_sessions(sessions, chrono::Utc::now());
    print!("{}", render::profile(&profile));
    Ok(())
}

/// Write a config file with the current (default or loaded) values.
pub(super) fn cmd_init(config: &Config, force: bool) -> Result<()> {
    let path = Config::system_config_path();
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration already exists at {:?}. Use --force to overwrite.",
            path
        );
    }
    config.save(&path)?;
    println!("Configuration written to {}", path.display());
    if !config.has_api_key() {
        println!("Set GEMINI_API_KEY before running `debate-coach serve`.");
    }
    Ok(())
}

pub(super) fn cmd_config(config: &Config, show_secrets: bool) -> Result<()> {
    let text = toml::to_string_pretty(config).context("Failed to serialize config")?;
    print!("{}", text);

    if show_secrets {
        match &config.gemini.api_key {
            Some(key) => println!("\n# gemini.api_key = {:?}", key.expose_secret()),
            None => println!("\n# gemini.api_key is not set"),
        }
    }
    Ok(())
}

pub(super) async fn cmd_db(config: &Config, operation: DbCommands) -> Result<()> {
    let repo = open_repository(config).await?;
    match operation {
        DbCommands::Init => {
            println!("Session store ready at {}", config.database.path.display());
        }
        DbCommands::Stats => {
            let count = repo.count().await?;
            println!("Database: {}", config.database.path.display());
            println!("Sessions: {}", count);
        }
    }
    Ok(())
}
