//! JSON REST API for Campuscare.
//!
//! Exposes an axum [`Router`] backed by any
//! [`campuscare_core::store::DirectoryStore`]. Auth, CORS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest(campuscare_api::API_PREFIX, campuscare_api::api_router(store.clone()))
//! ```

pub mod colleges;
pub mod error;
pub mod resources;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use campuscare_core::store::DirectoryStore;

pub use error::ApiError;

/// Path the router is expected to be nested under. Used to build `Location`
/// headers.
pub const API_PREFIX: &str = "/api";

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DirectoryStore + 'static,
{
  Router::new()
    // Colleges
    .route("/colleges", get(colleges::list::<S>).post(colleges::create::<S>))
    .route("/colleges/bulk", post(colleges::bulk_import::<S>))
    .route(
      "/colleges/{id}",
      get(colleges::get_one::<S>)
        .put(colleges::update::<S>)
        .delete(colleges::delete::<S>),
    )
    .route("/colleges/{id}/resources", get(colleges::resources::<S>))
    // Resources
    .route("/resources", post(resources::create::<S>))
    .with_state(store)
}

// ─── Router tests ─────────────────────────────────────────────────────────────
