//! Error type for `campuscare-store-sqlite`.

use campuscare_core::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Core(#[from] campuscare_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Core(e) => e.kind(),
      Error::Database(_) | Error::DateParse(_) => ErrorKind::Unexpected,
    }
  }
}

// ─── Constraint detection ────────────────────────────────────────────────────

fn extended_code(err: &tokio_rusqlite::Error) -> Option<i32> {
  match err {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)) => {
      Some(e.extended_code)
    }
    _ => None,
  }
}

/// The statement hit the UNIQUE index on `colleges.name`.
pub(crate) fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  extended_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}

/// The statement referenced a college that does not exist.
pub(crate) fn is_foreign_key_violation(err: &tokio_rusqlite::Error) -> bool {
  extended_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}
