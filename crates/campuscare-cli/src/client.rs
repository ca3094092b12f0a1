//! Async HTTP client wrapping the Campuscare JSON API.

use anyhow::{Context, Result, anyhow};
use campuscare_core::college::{College, NewCollege};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the Campuscare API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Sent as `X-Api-Key` on writes when non-empty.
  pub api_key:  String,
}

/// Async HTTP client for the Campuscare JSON REST API.
///
/// Cheap to clone, since the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
  message: String,
  #[serde(default)]
  detail:  Option<String>,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(60))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.api_key.is_empty() {
      req
    } else {
      req.header("X-Api-Key", &self.config.api_key)
    }
  }

  /// Turn a non-2xx response into an error carrying the server's message.
  async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let reason = match serde_json::from_str::<MessageBody>(&text) {
      Ok(MessageBody { message, detail: Some(detail) }) => format!("{message} ({detail})"),
      Ok(MessageBody { message, detail: None }) => message,
      Err(_) => text,
    };
    Err(anyhow!("{what} → {status}: {reason}"))
  }

  // ── Colleges ──────────────────────────────────────────────────────────────

  /// `GET /api/colleges`
  pub async fn list_colleges(&self) -> Result<Vec<College>> {
    let resp = self
      .client
      .get(self.url("/colleges"))
      .send()
      .await
      .context("GET /colleges failed")?;

    Self::check(resp, "GET /colleges")
      .await?
      .json()
      .await
      .context("deserialising colleges")
  }

  /// `POST /api/colleges/bulk`. Returns the server's summary message.
  pub async fn bulk_import(&self, colleges: &[NewCollege]) -> Result<String> {
    let resp = self
      .auth(self.client.post(self.url("/colleges/bulk")))
      .json(colleges)
      .send()
      .await
      .context("POST /colleges/bulk failed")?;

    let body: MessageBody = Self::check(resp, "POST /colleges/bulk")
      .await?
      .json()
      .await
      .context("deserialising import response")?;
    Ok(body.message)
  }
}
