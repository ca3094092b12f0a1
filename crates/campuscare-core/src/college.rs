//! College, the parent entity of the directory.
//!
//! A college owns its resources. Resources hold the parent's id only, so a
//! serialised college nests its resources and nothing points back up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::{NewResource, Resource};

/// A stored college with its resources populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
  pub id:         i64,
  /// Unique across the directory; the natural key for bulk import.
  pub name:       String,
  /// Free text, e.g. "Columbus, OH".
  pub location:   String,
  pub latitude:   f64,
  pub longitude:  f64,
  pub website:    String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub resources:  Vec<Resource>,
}

/// Input for creating a college, optionally with resources attached.
///
/// Used by `create_college` and, one per element, by `bulk_import`. Any
/// `collegeId` on attached resources is ignored; the store assigns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollege {
  pub name:      String,
  pub location:  String,
  pub latitude:  f64,
  pub longitude: f64,
  #[serde(default)]
  pub website:   String,
  #[serde(default)]
  pub resources: Vec<NewResource>,
}

impl NewCollege {
  pub fn new(
    name: impl Into<String>,
    location: impl Into<String>,
    latitude: f64,
    longitude: f64,
  ) -> Self {
    Self {
      name: name.into(),
      location: location.into(),
      latitude,
      longitude,
      ..Self::default()
    }
  }

  pub fn with_website(mut self, website: impl Into<String>) -> Self {
    self.website = website.into();
    self
  }

  pub fn with_resource(mut self, resource: NewResource) -> Self {
    self.resources.push(resource);
    self
  }
}

/// Full replacement of a college's mutable fields.
///
/// Resources are not part of an update; they change only through
/// `create_resource`, `bulk_import` or cascade delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeUpdate {
  /// Must match the id in the request path; zero when omitted.
  #[serde(default)]
  pub id:        i64,
  pub name:      String,
  pub location:  String,
  pub latitude:  f64,
  pub longitude: f64,
  #[serde(default)]
  pub website:   String,
}

/// Counts reported by `bulk_import`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
  /// Colleges that did not exist before the import.
  pub inserted:  usize,
  /// Existing colleges whose fields and resources were replaced.
  pub updated:   usize,
  /// Resources written across the whole batch.
  pub resources: usize,
}

impl ImportSummary {
  pub fn total(&self) -> usize { self.inserted + self.updated }
}
