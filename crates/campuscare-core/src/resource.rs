//! Resource: a mental-health support service offered by a college.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored resource.
///
/// Only the owning college's id is kept; there is no link back to the
/// college value itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
  pub id:              i64,
  pub college_id:      i64,
  pub service_name:    String,
  pub description:     String,
  pub contact_email:   String,
  pub contact_phone:   String,
  pub contact_website: String,
  pub department:      String,
  pub office_hours:    String,
  pub location:        String,
  /// Guidance aimed at first-year students.
  pub freshman_notes:  String,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

/// Input for creating a resource.
///
/// `college_id` is required by `create_resource`. When the resource is nested
/// in a [`NewCollege`](crate::college::NewCollege) it is ignored and the
/// owning college's id is used instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewResource {
  pub college_id:      i64,
  pub service_name:    String,
  pub description:     String,
  pub contact_email:   String,
  pub contact_phone:   String,
  pub contact_website: String,
  pub department:      String,
  pub office_hours:    String,
  pub location:        String,
  pub freshman_notes:  String,
}

impl NewResource {
  pub fn new(service_name: impl Into<String>) -> Self {
    Self { service_name: service_name.into(), ..Self::default() }
  }

  pub fn for_college(mut self, college_id: i64) -> Self {
    self.college_id = college_id;
    self
  }

  /// Whether at least one contact channel is filled in.
  pub fn has_contact(&self) -> bool {
    [&self.contact_email, &self.contact_phone, &self.contact_website]
      .iter()
      .any(|s| !s.trim().is_empty())
  }
}
