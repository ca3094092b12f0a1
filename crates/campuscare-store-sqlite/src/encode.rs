//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 UTC strings with a fixed six-digit
//! fraction, so lexical order matches chronological order. Values are
//! truncated to microseconds before they are handed back to callers, which
//! keeps a freshly written entity equal to the same entity read back later.

use campuscare_core::{college::College, resource::Resource};
use chrono::{DateTime, SecondsFormat, SubsecRound as _, TimeDelta, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// [`decode_dt`] for use inside a connection closure, where only
/// `rusqlite` errors can be propagated.
pub fn decode_dt_sql(s: &str) -> rusqlite::Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| {
      rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// The current time at storage precision.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

/// A timestamp strictly later than `prior`: now, or one microsecond past
/// `prior` if the clock has not moved (or has gone backwards) since.
pub fn advance(prior: DateTime<Utc>) -> DateTime<Utc> {
  let current = now();
  if current > prior {
    current
  } else {
    prior + TimeDelta::microseconds(1)
  }
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub const COLLEGE_COLUMNS: &str =
  "id, name, location, latitude, longitude, website, created_at, updated_at";

pub const RESOURCE_COLUMNS: &str = "id, college_id, service_name, description, \
   contact_email, contact_phone, contact_website, department, office_hours, \
   location, freshman_notes, created_at, updated_at";

/// A `colleges` row plus its `resources` rows, still in column encoding.
pub struct RawCollege {
  pub id:         i64,
  pub name:       String,
  pub location:   String,
  pub latitude:   f64,
  pub longitude:  f64,
  pub website:    String,
  pub created_at: String,
  pub updated_at: String,
  pub resources:  Vec<RawResource>,
}

impl RawCollege {
  /// Map a row selected with [`COLLEGE_COLUMNS`]. Resources start empty.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      location:   row.get(2)?,
      latitude:   row.get(3)?,
      longitude:  row.get(4)?,
      website:    row.get(5)?,
      created_at: row.get(6)?,
      updated_at: row.get(7)?,
      resources:  Vec::new(),
    })
  }

  pub fn into_college(self) -> Result<College> {
    Ok(College {
      id:         self.id,
      name:       self.name,
      location:   self.location,
      latitude:   self.latitude,
      longitude:  self.longitude,
      website:    self.website,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      resources:  self
        .resources
        .into_iter()
        .map(RawResource::into_resource)
        .collect::<Result<_>>()?,
    })
  }
}

pub struct RawResource {
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
  pub freshman_notes:  String,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawResource {
  /// Map a row selected with [`RESOURCE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      college_id:      row.get(1)?,
      service_name:    row.get(2)?,
      description:     row.get(3)?,
      contact_email:   row.get(4)?,
      contact_phone:   row.get(5)?,
      contact_website: row.get(6)?,
      department:      row.get(7)?,
      office_hours:    row.get(8)?,
      location:        row.get(9)?,
      freshman_notes:  row.get(10)?,
      created_at:      row.get(11)?,
      updated_at:      row.get(12)?,
    })
  }

  pub fn into_resource(self) -> Result<Resource> {
    Ok(Resource {
      id:              self.id,
      college_id:      self.college_id,
      service_name:    self.service_name,
      description:     self.description,
      contact_email:   self.contact_email,
      contact_phone:   self.contact_phone,
      contact_website: self.contact_website,
      department:      self.department,
      office_hours:    self.office_hours,
      location:        self.location,
      freshman_notes:  self.freshman_notes,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_roundtrip_at_microsecond_precision() {
    let t = now();
    assert_eq!(decode_dt(&encode_dt(t)).unwrap(), t);
    assert!(encode_dt(t).ends_with('Z'));
  }

  #[test]
  fn advance_is_strictly_later_even_for_future_prior() {
    let prior = now() + TimeDelta::seconds(60);
    let next = advance(prior);
    assert_eq!(next, prior + TimeDelta::microseconds(1));
    assert!(advance(next) > next);
  }

  #[test]
  fn encoded_order_is_chronological() {
    let a = now();
    let b = a + TimeDelta::microseconds(1);
    assert!(encode_dt(a) < encode_dt(b));
  }
}
