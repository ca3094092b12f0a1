//! The `DirectoryStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `campuscare-store-sqlite`). Higher layers (`campuscare-api`, the seeder)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  Classify,
  college::{College, CollegeUpdate, ImportSummary, NewCollege},
  resource::{NewResource, Resource},
};

/// Abstraction over a college directory backend.
///
/// Every method is one unit of work: it either commits completely or leaves
/// the store unchanged.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every college, each with its resources populated.
  fn list_colleges_with_resources(
    &self,
  ) -> impl Future<Output = Result<Vec<College>, Self::Error>> + Send + '_;

  /// A single college with its resources. Returns `None` if not found.
  fn get_college_with_resources(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<College>, Self::Error>> + Send + '_;

  /// Resources whose `college_id` matches. An unknown college yields an empty
  /// list, not an error.
  fn list_resources_for_college(
    &self,
    college_id: i64,
  ) -> impl Future<Output = Result<Vec<Resource>, Self::Error>> + Send + '_;

  /// Number of stored colleges.
  fn college_count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert a college together with any attached resources.
  ///
  /// Fails with a uniqueness error if the name is taken.
  fn create_college(
    &self,
    input: NewCollege,
  ) -> impl Future<Output = Result<College, Self::Error>> + Send + '_;

  /// Insert a resource for `input.college_id`.
  ///
  /// Fails with a foreign-key error if that college does not exist.
  fn create_resource(
    &self,
    input: NewResource,
  ) -> impl Future<Output = Result<Resource, Self::Error>> + Send + '_;

  /// Replace every mutable field of college `update.id` and advance its
  /// `updated_at` strictly past the previous value.
  ///
  /// Fails with not-found if the college does not exist.
  fn update_college(
    &self,
    update: CollegeUpdate,
  ) -> impl Future<Output = Result<College, Self::Error>> + Send + '_;

  /// Delete a college and, by cascade, its resources.
  ///
  /// Deleting an unknown id is a no-op; the return value says whether a row
  /// was removed.
  fn delete_college(&self, id: i64) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Upsert a batch of colleges keyed by name.
  ///
  /// An existing college keeps its id and `created_at`, takes the incoming
  /// location, coordinates and website, and has its resources replaced
  /// wholesale. Unknown names are inserted. The batch commits as one
  /// transaction. An empty batch is an invalid-argument error.
  ///
  /// Resource ids are not preserved across a re-import.
  fn bulk_import(
    &self,
    colleges: Vec<NewCollege>,
  ) -> impl Future<Output = Result<ImportSummary, Self::Error>> + Send + '_;
}
