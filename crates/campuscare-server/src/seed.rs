//! One-shot startup seeding from a JSON fixture.
//!
//! `main` awaits [`run`] before binding the listener. The steps are:
//!
//! 1. If any college exists, stop ([`SeedOutcome::AlreadySeeded`]).
//! 2. Locate the fixture; if there is none, stop with a warning.
//! 3. Parse it and insert every college as one bulk-import batch.
//!
//! Nothing here is allowed to abort startup: every failure is logged and
//! reported as an outcome instead of an error.

use std::path::{Path, PathBuf};

use campuscare_core::{Classify as _, ErrorKind, fixture, store::DirectoryStore};
use thiserror::Error;
use tracing::{error, info, warn};

/// Where the fixture lives relative to each candidate directory.
pub const FIXTURE_RELATIVE_PATH: &str = "seed/starter_colleges.json";

/// How the seeder finds its fixture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureSource {
  /// Try `dir/FIXTURE_RELATIVE_PATH` for each directory in order; the first
  /// existing file wins.
  Search(Vec<PathBuf>),
  /// Use exactly this file.
  Path(PathBuf),
}

impl FixtureSource {
  /// The executable's directory first, then the working directory.
  pub fn default_search() -> Self {
    let mut dirs = Vec::new();
    if let Ok(exe) = std::env::current_exe()
      && let Some(dir) = exe.parent()
    {
      dirs.push(dir.to_path_buf());
    }
    if let Ok(cwd) = std::env::current_dir() {
      dirs.push(cwd);
    }
    FixtureSource::Search(dirs)
  }

  /// An explicit path from configuration overrides the search.
  pub fn from_config(seed_path: Option<&Path>) -> Self {
    match seed_path {
      Some(p) => FixtureSource::Path(p.to_path_buf()),
      None => Self::default_search(),
    }
  }

  /// Every path this source would consider, in order.
  pub fn candidates(&self) -> Vec<PathBuf> {
    match self {
      FixtureSource::Search(dirs) => {
        dirs.iter().map(|d| d.join(FIXTURE_RELATIVE_PATH)).collect()
      }
      FixtureSource::Path(p) => vec![p.clone()],
    }
  }

  pub fn locate(&self) -> Option<PathBuf> {
    self.candidates().into_iter().find(|p| p.is_file())
  }
}

/// What a seeding attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
  /// The store already held at least one college.
  AlreadySeeded,
  /// No fixture file was found at any candidate path.
  FixtureMissing { searched: Vec<PathBuf> },
  /// The fixture was unreadable, not a JSON array, empty, or held an invalid
  /// record.
  FixtureInvalid { path: PathBuf, reason: String },
  Seeded { colleges: usize, resources: usize },
  /// The store itself failed.
  Failed { reason: String },
}

/// The store itself failed while seeding.
#[derive(Debug, Error)]
#[error("store error: {0}")]
struct StoreFailure(#[source] Box<dyn std::error::Error + Send + Sync>);

impl StoreFailure {
  fn new(e: impl std::error::Error + Send + Sync + 'static) -> Self { Self(Box::new(e)) }
}

/// Seed `store` from `source` if it is empty. Never fails.
pub async fn run<S>(store: &S, source: &FixtureSource) -> SeedOutcome
where
  S: DirectoryStore,
{
  let outcome = match try_run(store, source).await {
    Ok(outcome) => outcome,
    Err(e) => SeedOutcome::Failed { reason: e.to_string() },
  };

  match &outcome {
    SeedOutcome::AlreadySeeded => info!("store already populated; skipping seed"),
    SeedOutcome::FixtureMissing { searched } => {
      warn!(?searched, "seed data file not found; store will start empty")
    }
    SeedOutcome::FixtureInvalid { path, reason } => {
      warn!(path = %path.display(), %reason, "seed data file is empty or invalid; store will start empty")
    }
    SeedOutcome::Seeded { colleges, resources } => {
      info!(colleges, resources, "store seeded")
    }
    SeedOutcome::Failed { reason } => error!(%reason, "seeding failed; continuing startup"),
  }
  outcome
}

async fn try_run<S>(store: &S, source: &FixtureSource) -> Result<SeedOutcome, StoreFailure>
where
  S: DirectoryStore,
{
  if store.college_count().await.map_err(StoreFailure::new)? > 0 {
    return Ok(SeedOutcome::AlreadySeeded);
  }

  let Some(path) = source.locate() else {
    return Ok(SeedOutcome::FixtureMissing { searched: source.candidates() });
  };

  let invalid = |reason: String| SeedOutcome::FixtureInvalid { path: path.clone(), reason };

  let json = match tokio::fs::read_to_string(&path).await {
    Ok(json) => json,
    Err(e) => return Ok(invalid(e.to_string())),
  };
  let colleges = match fixture::parse_colleges(&json) {
    Ok(colleges) if colleges.is_empty() => return Ok(invalid("no colleges in fixture".into())),
    Ok(colleges) => colleges,
    Err(e) => return Ok(invalid(e.to_string())),
  };

  let resources = colleges.iter().map(|c| c.resources.len()).sum();
  let count = colleges.len();

  match store.bulk_import(colleges).await {
    Ok(_) => Ok(SeedOutcome::Seeded { colleges: count, resources }),
    Err(e) if e.kind() == ErrorKind::InvalidArgument => Ok(invalid(e.to_string())),
    Err(e) => Err(StoreFailure::new(e)),
  }
}
