//! Handlers for `/colleges` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/colleges` | Every college with resources |
//! | `POST`   | `/colleges` | Body: [`NewCollege`]; 201 + `Location` |
//! | `POST`   | `/colleges/bulk` | Body: `[NewCollege]`; upsert by name |
//! | `GET`    | `/colleges/:id` | 404 if not found |
//! | `PUT`    | `/colleges/:id` | Body: [`CollegeUpdate`]; ids must match; 204 |
//! | `DELETE` | `/colleges/:id` | 204 whether or not it existed |
//! | `GET`    | `/colleges/:id/resources` | Possibly empty list |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::{StatusCode, header},
  response::IntoResponse,
};
use campuscare_core::{
  college::{College, CollegeUpdate, NewCollege},
  resource::Resource,
  store::DirectoryStore,
};
use serde::Serialize;

use crate::{API_PREFIX, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /colleges`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<College>>, ApiError>
where
  S: DirectoryStore,
{
  let colleges = store
    .list_colleges_with_resources()
    .await
    .map_err(|e| ApiError::store(e, StatusCode::INTERNAL_SERVER_ERROR))?;
  Ok(Json(colleges))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /colleges/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<College>, ApiError>
where
  S: DirectoryStore,
{
  let college = store
    .get_college_with_resources(id)
    .await
    .map_err(|e| ApiError::store(e, StatusCode::BAD_REQUEST))?
    .ok_or_else(|| ApiError::NotFound(format!("college {id} not found")))?;
  Ok(Json(college))
}

/// `GET /colleges/:id/resources`
pub async fn resources<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Resource>>, ApiError>
where
  S: DirectoryStore,
{
  let resources = store
    .list_resources_for_college(id)
    .await
    .map_err(|e| ApiError::store(e, StatusCode::BAD_REQUEST))?;
  Ok(Json(resources))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /colleges`: returns 201, the stored college, and a `Location`
/// header pointing at `GET /colleges/:id`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewCollege>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let Json(input) = body?;
  let college = store
    .create_college(input)
    .await
    .map_err(|e| ApiError::store(e, StatusCode::BAD_REQUEST))?;

  let location = format!("{API_PREFIX}/colleges/{}", college.id);
  Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(college)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /colleges/:id`: the body's `id` must equal the path id.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  body: Result<Json<CollegeUpdate>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: DirectoryStore,
{
  let Json(update) = body?;
  if update.id != id {
    return Err(ApiError::bad_request(format!(
      "path id {id} does not match body id {}",
      update.id
    )));
  }

  store
    .update_college(update)
    .await
    .map_err(|e| ApiError::store(e, StatusCode::BAD_REQUEST))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /colleges/:id`: 204 even if the college did not exist.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: DirectoryStore,
{
  store
    .delete_college(id)
    .await
    .map_err(|e| ApiError::store(e, StatusCode::BAD_REQUEST))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Bulk import ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BulkImportResponse {
  pub message:  String,
  pub inserted: usize,
  pub updated:  usize,
}

/// `POST /colleges/bulk` with a JSON array of colleges as the body.
///
/// A `null`, empty, or missing array is a 400; store failures are a 500.
pub async fn bulk_import<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<Option<Vec<NewCollege>>>, JsonRejection>,
) -> Result<Json<BulkImportResponse>, ApiError>
where
  S: DirectoryStore,
{
  let colleges = match body? {
    Json(Some(colleges)) if !colleges.is_empty() => colleges,
    _ => return Err(ApiError::bad_request("No colleges provided.")),
  };
  let count = colleges.len();

  let summary = store
    .bulk_import(colleges)
    .await
    .map_err(|e| ApiError::store(e, StatusCode::INTERNAL_SERVER_ERROR))?;

  tracing::info!(
    count,
    inserted = summary.inserted,
    updated = summary.updated,
    "bulk import"
  );
  Ok(Json(BulkImportResponse {
    message:  format!("Successfully imported {count} college(s)."),
    inserted: summary.inserted,
    updated:  summary.updated,
  }))
}
