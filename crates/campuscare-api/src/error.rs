//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use campuscare_core::{Classify, ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {message}")]
  BadRequest {
    message: String,
    detail:  Option<String>,
  },

  #[error("internal error: {message}")]
  Internal {
    message: String,
    detail:  Option<String>,
  },
}

/// Body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
  message: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  detail:  Option<&'a str>,
}

impl ApiError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    ApiError::BadRequest { message: message.into(), detail: None }
  }

  /// Translate a store error.
  ///
  /// Caller faults (bad input, duplicate name, missing parent or id) are
  /// always 400. Store failures get `unexpected`, which differs per endpoint.
  pub fn store<E>(err: E, unexpected: StatusCode) -> Self
  where
    E: std::error::Error + Classify,
  {
    let message = err.to_string();
    let detail = std::error::Error::source(&err).map(ToString::to_string);

    match err.kind() {
      ErrorKind::Unexpected if unexpected.is_server_error() => {
        tracing::error!(error = %message, detail = ?detail, "store failure");
        ApiError::Internal { message, detail }
      }
      _ => ApiError::BadRequest { message, detail },
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::bad_request(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message, detail) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.as_str(), None),
      ApiError::BadRequest { message, detail } => {
        (StatusCode::BAD_REQUEST, message.as_str(), detail.as_deref())
      }
      ApiError::Internal { message, detail } => {
        (StatusCode::INTERNAL_SERVER_ERROR, message.as_str(), detail.as_deref())
      }
    };
    (status, Json(ErrorBody { message, detail })).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Error)]
  #[error("boom")]
  struct Boom(ErrorKind);

  impl Classify for Boom {
    fn kind(&self) -> ErrorKind { self.0 }
  }

  #[test]
  fn caller_faults_are_bad_requests() {
    for kind in [
      ErrorKind::NotFound,
      ErrorKind::Uniqueness,
      ErrorKind::ForeignKey,
      ErrorKind::InvalidArgument,
    ] {
      let err = ApiError::store(Boom(kind), StatusCode::INTERNAL_SERVER_ERROR);
      assert!(matches!(err, ApiError::BadRequest { .. }), "{kind:?}");
    }
  }

  #[test]
  fn unexpected_uses_the_endpoint_status() {
    let err = ApiError::store(Boom(ErrorKind::Unexpected), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(matches!(err, ApiError::Internal { .. }));

    let err = ApiError::store(Boom(ErrorKind::Unexpected), StatusCode::BAD_REQUEST);
    assert!(matches!(err, ApiError::BadRequest { .. }));
  }

  #[test]
  fn detail_is_omitted_when_absent() {
    let body = serde_json::to_value(ErrorBody { message: "m", detail: None }).unwrap();
    assert_eq!(body, serde_json::json!({ "message": "m" }));
  }
}
