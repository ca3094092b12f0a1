//! HTTP server assembly for Campuscare.
//!
//! Mounts the JSON API under [`API_PREFIX`](campuscare_api::API_PREFIX)
//! behind the API-key check, adds request tracing and CORS, and optionally
//! serves the static map UI. Seeding lives in [`seed`] and runs before the
//! router is ever built.

pub mod auth;
pub mod error;
pub mod seed;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use campuscare_api::{API_PREFIX, api_router};
use campuscare_core::store::DirectoryStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use auth::{AuthConfig, require_api_key};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CAMPUSCARE_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  /// Shared secret for write endpoints. Absent or empty disables the check.
  pub api_key:         Option<String>,
  /// Fixture file to seed from, bypassing the default search.
  pub seed_path:       Option<PathBuf>,
  /// Directory served at `/` (the map UI).
  pub static_dir:      Option<PathBuf>,
  /// Allow any origin, method and header.
  pub cors_permissive: bool,
}

/// Load configuration from an optional TOML file layered under environment
/// variables with the `CAMPUSCARE_` prefix.
pub fn load_config(path: impl Into<PathBuf>) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .set_default("host", "0.0.0.0")?
    .set_default("port", 58346)?
    .set_default("store_path", "campuscare.db")?
    .set_default("cors_permissive", true)?
    .add_source(config::File::from(path.into()).required(false))
    .add_source(config::Environment::with_prefix("CAMPUSCARE"))
    .build()?
    .try_deserialize()
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state handed to [`router`].
#[derive(Clone)]
pub struct AppState<S: DirectoryStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

impl<S: DirectoryStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    let auth = AuthConfig::new(config.api_key.clone());
    Self {
      store:  Arc::new(store),
      config: Arc::new(config),
      auth:   Arc::new(auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DirectoryStore + Clone + 'static,
{
  let api = api_router(state.store.clone())
    .layer(middleware::from_fn_with_state(state.auth.clone(), require_api_key));

  let mut app = Router::new().nest(API_PREFIX, api);

  if let Some(dir) = &state.config.static_dir {
    app = app.fallback_service(ServeDir::new(dir));
  }

  app = app.layer(TraceLayer::new_for_http());

  if state.config.cors_permissive {
    app = app.layer(CorsLayer::permissive());
  }

  app
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use campuscare_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  fn config(api_key: Option<&str>) -> ServerConfig {
    ServerConfig {
      host:            "127.0.0.1".to_string(),
      port:            58346,
      store_path:      PathBuf::from(":memory:"),
      api_key:         api_key.map(str::to_string),
      seed_path:       None,
      static_dir:      None,
      cors_permissive: true,
    }
  }

  async fn make_state(api_key: Option<&str>) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(store, config(api_key))
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(&str, &str)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  const NEW_COLLEGE: &str = r#"{
    "name": "Test University",
    "location": "Test City, OH",
    "latitude": 40.0,
    "longitude": -83.0
  }"#;

  const JSON: (&str, &str) = ("content-type", "application/json");

  #[tokio::test]
  async fn write_without_key_returns_401() {
    let state = make_state(Some("secret")).await;
    let resp = oneshot_raw(state.clone(), "POST", "/api/colleges", vec![JSON], NEW_COLLEGE).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Invalid or missing API key.");
    assert_eq!(state.store.college_count().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn write_with_wrong_key_returns_401() {
    let state = make_state(Some("secret")).await;
    let resp = oneshot_raw(
      state,
      "DELETE",
      "/api/colleges/1",
      vec![("x-api-key", "guess")],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn write_with_key_reaches_the_handler() {
    let state = make_state(Some("secret")).await;
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/api/colleges",
      vec![JSON, ("x-api-key", "secret")],
      NEW_COLLEGE,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(state.store.college_count().await.unwrap(), 1);
  }

  #[tokio::test]
  async fn reads_never_need_a_key() {
    let state = make_state(Some("secret")).await;
    let resp = oneshot_raw(state, "GET", "/api/colleges", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn no_configured_key_leaves_writes_open() {
    let state = make_state(None).await;
    let resp = oneshot_raw(state, "POST", "/api/colleges", vec![JSON], NEW_COLLEGE).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  #[tokio::test]
  async fn cors_headers_are_present() {
    let state = make_state(None).await;
    let resp = oneshot_raw(
      state,
      "GET",
      "/api/colleges",
      vec![("origin", "http://example.com")],
      "",
    )
    .await;
    assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
  }

  #[test]
  fn config_defaults_apply_without_a_file() {
    let cfg = load_config("/nonexistent/campuscare.toml").unwrap();
    assert_eq!(cfg.port, 58346);
    assert_eq!(cfg.store_path, PathBuf::from("campuscare.db"));
    assert!(cfg.cors_permissive);
  }
}
