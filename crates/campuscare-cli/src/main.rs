//! `campuscare`: command-line companion for the Campuscare directory server.
//!
//! # Usage
//!
//! ```text
//! campuscare list
//! campuscare validate --file seed/starter_colleges.json
//! campuscare --api-key secret import --file new_colleges.json
//! campuscare --config ~/.config/campuscare/cli.toml list
//! ```

mod client;
mod report;

use std::{
  path::{Path, PathBuf},
  process::ExitCode,
};

use anyhow::{Context, Result, bail};
use campuscare_core::{college::NewCollege, fixture, validate};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:58346";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "campuscare", about = "Command-line client for the Campuscare directory")]
struct Args {
  /// Path to a TOML config file (url, api_key).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Base URL of the campuscare server (default: http://localhost:58346).
  #[arg(long, env = "CAMPUSCARE_URL", global = true)]
  url: Option<String>,

  /// Key sent as X-Api-Key on writes.
  #[arg(long, env = "CAMPUSCARE_API_KEY", global = true, hide_env_values = true)]
  api_key: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every college with its resource count.
  List,
  /// Upload a fixture file through the bulk import endpoint.
  Import {
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
  },
  /// Check a fixture file without contacting the server.
  Validate {
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:     String,
  #[serde(default)]
  api_key: String,
}

impl Args {
  /// CLI flags override the config file, which overrides defaults.
  fn api_config(&self, file_cfg: &ConfigFile) -> ApiConfig {
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    ApiConfig {
      base_url: self
        .url
        .clone()
        .or_else(|| non_empty(&file_cfg.url))
        .unwrap_or_else(|| DEFAULT_URL.to_string()),
      api_key:  self
        .api_key
        .clone()
        .or_else(|| non_empty(&file_cfg.api_key))
        .unwrap_or_default(),
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  match &args.command {
    Command::List => {
      let client = ApiClient::new(args.api_config(&file_cfg))?;
      list(&client).await?;
      Ok(ExitCode::SUCCESS)
    }
    Command::Import { file } => {
      let client = ApiClient::new(args.api_config(&file_cfg))?;
      import(&client, file).await?;
      Ok(ExitCode::SUCCESS)
    }
    Command::Validate { file } => validate_file(file),
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn list(client: &ApiClient) -> Result<()> {
  let colleges = client.list_colleges().await?;
  if colleges.is_empty() {
    println!("No colleges in the directory.");
    return Ok(());
  }

  let width = colleges.iter().map(|c| c.name.len()).max().unwrap_or(0);
  for c in &colleges {
    println!(
      "{:>4}  {:<width$}  {:<24}  {} resource(s)",
      c.id,
      c.name,
      c.location,
      c.resources.len(),
    );
  }
  println!("{} college(s)", colleges.len());
  Ok(())
}

fn read_fixture(path: &Path) -> Result<Vec<NewCollege>> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading fixture {}", path.display()))?;
  fixture::parse_colleges(&raw).with_context(|| format!("parsing fixture {}", path.display()))
}

async fn import(client: &ApiClient, path: &Path) -> Result<()> {
  let colleges = read_fixture(path)?;
  if let Err(e) = validate::batch(&colleges) {
    bail!("{} was not sent: {e}", path.display());
  }

  tracing::info!(count = colleges.len(), "uploading colleges");
  let message = client.bulk_import(&colleges).await?;
  println!("{message}");
  Ok(())
}

fn validate_file(path: &Path) -> Result<ExitCode> {
  let colleges = read_fixture(path)?;
  let report = report::check(&colleges);

  for finding in &report.findings {
    println!("{finding}");
  }
  let errors = report.errors().count();
  let warnings = report.warnings().count();
  println!(
    "{}: {} college(s), {} resource(s), {errors} error(s), {warnings} warning(s)",
    path.display(),
    report.colleges,
    report.resources,
  );

  Ok(if report.has_errors() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
