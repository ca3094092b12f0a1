//! Error types for `campuscare-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("college not found: {0}")]
  CollegeNotFound(i64),

  #[error("a college named {0:?} already exists")]
  DuplicateCollegeName(String),

  #[error("college {0} does not exist")]
  MissingCollege(i64),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// The backend-independent category of a directory error.
///
/// The HTTP layer picks status codes from this, never from a concrete
/// backend error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// No entity with the requested id.
  NotFound,
  /// A college with the same name already exists.
  Uniqueness,
  /// A resource references a college that does not exist.
  ForeignKey,
  /// Malformed or empty input.
  InvalidArgument,
  /// Store or connectivity failure.
  Unexpected,
}

/// Implemented by every error a [`DirectoryStore`](crate::store::DirectoryStore)
/// can return.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::CollegeNotFound(_) => ErrorKind::NotFound,
      Error::DuplicateCollegeName(_) => ErrorKind::Uniqueness,
      Error::MissingCollege(_) => ErrorKind::ForeignKey,
      Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
      Error::Serialization(_) => ErrorKind::Unexpected,
    }
  }
}
