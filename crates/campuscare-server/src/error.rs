//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid or missing API key")]
  Unauthorized,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid or missing API key." })),
      )
        .into_response(),
    }
  }
}
