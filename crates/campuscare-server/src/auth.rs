//! Shared-secret API key check for write endpoints.
//!
//! `POST`, `PUT` and `DELETE` requests must carry an `X-Api-Key` header equal
//! to the configured key. Reads are never checked. With no key configured
//! the check is off entirely.

use std::sync::Arc;

use axum::{
  extract::{Request, State},
  http::{HeaderMap, Method},
  middleware::Next,
  response::{IntoResponse, Response},
};

use crate::error::Error;

pub const API_KEY_HEADER: &str = "x-api-key";

/// The key accepted by this server instance, if any.
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
  api_key: Option<String>,
}

impl AuthConfig {
  /// An empty or whitespace-only key counts as no key.
  pub fn new(api_key: Option<String>) -> Self {
    Self { api_key: api_key.filter(|k| !k.trim().is_empty()) }
  }

  pub fn is_enabled(&self) -> bool { self.api_key.is_some() }
}

fn is_write(method: &Method) -> bool {
  matches!(*method, Method::POST | Method::PUT | Method::DELETE)
}

/// Verify the key header directly. Used by the middleware and by tests.
pub fn verify_api_key(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  let Some(expected) = &config.api_key else {
    return Ok(());
  };

  let provided = headers
    .get(API_KEY_HEADER)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  if provided != expected {
    return Err(Error::Unauthorized);
  }
  Ok(())
}

/// Middleware guarding the API router.
pub async fn require_api_key(
  State(auth): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Response {
  if is_write(req.method())
    && let Err(e) = verify_api_key(req.headers(), &auth)
  {
    tracing::warn!(method = %req.method(), uri = %req.uri(), "rejected write without valid API key");
    return e.into_response();
  }
  next.run(req).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn headers(key: Option<&str>) -> HeaderMap {
    let mut h = HeaderMap::new();
    if let Some(k) = key {
      h.insert(API_KEY_HEADER, HeaderValue::from_str(k).unwrap());
    }
    h
  }

  #[test]
  fn correct_key() {
    let cfg = AuthConfig::new(Some("secret".into()));
    assert!(verify_api_key(&headers(Some("secret")), &cfg).is_ok());
  }

  #[test]
  fn wrong_key() {
    let cfg = AuthConfig::new(Some("secret".into()));
    assert!(matches!(
      verify_api_key(&headers(Some("guess")), &cfg),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn missing_header() {
    let cfg = AuthConfig::new(Some("secret".into()));
    assert!(matches!(verify_api_key(&headers(None), &cfg), Err(Error::Unauthorized)));
  }

  #[test]
  fn blank_key_disables_the_check() {
    let cfg = AuthConfig::new(Some("  ".into()));
    assert!(!cfg.is_enabled());
    assert!(verify_api_key(&headers(None), &cfg).is_ok());
  }

  #[test]
  fn only_mutating_methods_are_guarded() {
    assert!(is_write(&Method::POST));
    assert!(is_write(&Method::PUT));
    assert!(is_write(&Method::DELETE));
    assert!(!is_write(&Method::GET));
    assert!(!is_write(&Method::OPTIONS));
  }
}
