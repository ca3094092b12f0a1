//! Handler for `POST /resources`.
//!
//! Body: [`NewResource`] with a `collegeId` naming an existing college.
//! Returns 201 + the stored resource, or 400 if the college is missing.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use campuscare_core::{resource::NewResource, store::DirectoryStore};

use crate::error::ApiError;

/// `POST /resources`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewResource>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let Json(input) = body?;
  let resource = store
    .create_resource(input)
    .await
    .map_err(|e| ApiError::store(e, StatusCode::BAD_REQUEST))?;
  Ok((StatusCode::CREATED, Json(resource)))
}
