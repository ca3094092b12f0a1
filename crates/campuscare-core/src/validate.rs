//! Field-level validation shared by every write path.
//!
//! Stores call these before touching the database so an invalid record in a
//! bulk import rejects the whole batch without a partial write.

use crate::{
  Error, Result,
  college::{CollegeUpdate, NewCollege},
  resource::NewResource,
};

pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

fn required(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::InvalidArgument(format!("{field} must not be empty")));
  }
  Ok(())
}

fn coordinates(latitude: f64, longitude: f64) -> Result<()> {
  if !LATITUDE_RANGE.contains(&latitude) {
    return Err(Error::InvalidArgument(format!(
      "latitude {latitude} is outside [-90, 90]"
    )));
  }
  if !LONGITUDE_RANGE.contains(&longitude) {
    return Err(Error::InvalidArgument(format!(
      "longitude {longitude} is outside [-180, 180]"
    )));
  }
  Ok(())
}

/// Validate a resource on its own. Does not check that the parent exists;
/// that is the store's foreign key.
pub fn resource(r: &NewResource) -> Result<()> { required("serviceName", &r.service_name) }

/// Validate a college and every resource attached to it.
pub fn new_college(c: &NewCollege) -> Result<()> {
  required("name", &c.name)?;
  required("location", &c.location)?;
  coordinates(c.latitude, c.longitude)?;
  for r in &c.resources {
    resource(r).map_err(|e| match e {
      Error::InvalidArgument(msg) => {
        Error::InvalidArgument(format!("college {:?}: {msg}", c.name))
      }
      other => other,
    })?;
  }
  Ok(())
}

pub fn college_update(u: &CollegeUpdate) -> Result<()> {
  required("name", &u.name)?;
  required("location", &u.location)?;
  coordinates(u.latitude, u.longitude)
}

/// Validate a bulk-import batch. An empty batch is itself invalid.
pub fn batch(colleges: &[NewCollege]) -> Result<()> {
  if colleges.is_empty() {
    return Err(Error::InvalidArgument("no colleges provided".into()));
  }
  colleges.iter().try_for_each(new_college)
}
