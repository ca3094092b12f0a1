//! The on-disk fixture format for seeding and offline import.
//!
//! Fixture files use snake_case keys, unlike the camelCase runtime API. The
//! mapping to [`NewCollege`] lives here so the seeder and the CLI agree on it.

use serde::{Deserialize, Serialize};

use crate::{college::NewCollege, resource::NewResource, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureResource {
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureCollege {
  pub name:      String,
  pub location:  String,
  pub latitude:  f64,
  pub longitude: f64,
  pub website:   String,
  pub resources: Vec<FixtureResource>,
}

impl From<FixtureResource> for NewResource {
  fn from(r: FixtureResource) -> Self {
    NewResource {
      college_id:      0,
      service_name:    r.service_name,
      description:     r.description,
      contact_email:   r.contact_email,
      contact_phone:   r.contact_phone,
      contact_website: r.contact_website,
      department:      r.department,
      office_hours:    r.office_hours,
      location:        r.location,
      freshman_notes:  r.freshman_notes,
    }
  }
}

impl From<FixtureCollege> for NewCollege {
  fn from(c: FixtureCollege) -> Self {
    NewCollege {
      name:      c.name,
      location:  c.location,
      latitude:  c.latitude,
      longitude: c.longitude,
      website:   c.website,
      resources: c.resources.into_iter().map(NewResource::from).collect(),
    }
  }
}

/// Parse a fixture document (a JSON array of colleges).
pub fn parse(json: &str) -> Result<Vec<FixtureCollege>> { Ok(serde_json::from_str(json)?) }

/// Parse a fixture document straight into store inputs.
pub fn parse_colleges(json: &str) -> Result<Vec<NewCollege>> {
  Ok(parse(json)?.into_iter().map(NewCollege::from).collect())
}

#[cfg(test)]
mod tests {
  use super::*;

  const ONE_COLLEGE: &str = r#"[
    {
      "name": "Kenyon College",
      "location": "Gambier, OH",
      "latitude": 40.3756,
      "longitude": -82.3971,
      "website": "https://www.kenyon.edu",
      "resources": [
        {
          "service_name": "Cox Health and Counseling Center",
          "contact_phone": "740-427-5525",
          "freshman_notes": "Walk-in hours during orientation week"
        }
      ]
    }
  ]"#;

  #[test]
  fn maps_snake_case_keys() {
    let colleges = parse_colleges(ONE_COLLEGE).unwrap();
    assert_eq!(colleges.len(), 1);
    let c = &colleges[0];
    assert_eq!(c.name, "Kenyon College");
    assert_eq!(c.resources.len(), 1);
    let r = &c.resources[0];
    assert_eq!(r.service_name, "Cox Health and Counseling Center");
    assert_eq!(r.contact_phone, "740-427-5525");
    assert_eq!(r.freshman_notes, "Walk-in hours during orientation week");
    assert_eq!(r.description, "", "absent keys default to empty");
  }

  #[test]
  fn missing_resources_key_means_none() {
    let colleges =
      parse_colleges(r#"[{"name":"A","location":"B","latitude":1,"longitude":2}]"#).unwrap();
    assert!(colleges[0].resources.is_empty());
    assert_eq!(colleges[0].website, "");
  }

  #[test]
  fn rejects_non_array_document() {
    assert!(parse(r#"{"name":"A"}"#).is_err());
    assert!(parse("").is_err());
  }

  #[test]
  fn shipped_starter_fixture_is_valid() {
    let json = include_str!("../../../seed/starter_colleges.json");
    let colleges = parse_colleges(json).unwrap();
    assert_eq!(colleges.len(), 10);
    crate::validate::batch(&colleges).unwrap();
    assert!(colleges.iter().all(|c| !c.resources.is_empty()));
  }
}
