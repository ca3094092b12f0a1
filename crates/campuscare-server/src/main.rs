//! campuscare-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, seeds it on first run, and serves the JSON API over HTTP.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use campuscare_server::{AppState, load_config, seed};
use campuscare_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Campuscare directory server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = load_config(&cli.config).context("failed to load configuration")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Seed before the listener exists so no request can observe a half-seeded
  // store.
  let source = seed::FixtureSource::from_config(server_cfg.seed_path.as_deref());
  seed::run(&store, &source).await;

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState::new(store, server_cfg);

  if state.auth.is_enabled() {
    tracing::info!("API key protection is enabled for write endpoints");
  } else {
    tracing::warn!("no api_key configured; write endpoints are unprotected");
  }
  if let Some(dir) = &state.config.static_dir {
    tracing::info!("Serving static files from {}", dir.display());
  }

  let app = campuscare_server::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
