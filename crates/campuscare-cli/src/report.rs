//! Offline checks for fixture files.
//!
//! Errors are records the server would reject. Warnings are records it would
//! accept but that make for a thin directory entry.

use std::{fmt, sync::LazyLock};

use campuscare_core::{
  college::NewCollege,
  resource::NewResource,
  validate::{LATITUDE_RANGE, LONGITUDE_RANGE},
};
use regex::Regex;

/// Descriptions shorter than this are flagged.
pub const MIN_DESCRIPTION_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Error,
  Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
  pub severity: Severity,
  /// `college` or `college / service`.
  pub subject:  String,
  pub message:  String,
}

impl fmt::Display for Finding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let tag = match self.severity {
      Severity::Error => "error",
      Severity::Warning => "warning",
    };
    write!(f, "{tag}: {}: {}", self.subject, self.message)
  }
}

#[derive(Debug, Default)]
pub struct Report {
  pub colleges:  usize,
  pub resources: usize,
  pub findings:  Vec<Finding>,
}

impl Report {
  pub fn errors(&self) -> impl Iterator<Item = &Finding> {
    self.findings.iter().filter(|f| f.severity == Severity::Error)
  }

  pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
    self.findings.iter().filter(|f| f.severity == Severity::Warning)
  }

  pub fn has_errors(&self) -> bool { self.errors().next().is_some() }

  fn push(&mut self, severity: Severity, subject: &str, message: impl Into<String>) {
    self.findings.push(Finding {
      severity,
      subject: subject.to_string(),
      message: message.into(),
    });
  }
}

/// Check every college and resource in `colleges`.
pub fn check(colleges: &[NewCollege]) -> Report {
  let mut report = Report { colleges: colleges.len(), ..Report::default() };

  for (i, college) in colleges.iter().enumerate() {
    let subject = if college.name.trim().is_empty() {
      format!("college #{}", i + 1)
    } else {
      college.name.clone()
    };
    check_college(&mut report, &subject, college);

    for resource in &college.resources {
      report.resources += 1;
      check_resource(&mut report, &subject, resource);
    }
  }
  report
}

fn check_college(report: &mut Report, subject: &str, c: &NewCollege) {
  if c.name.trim().is_empty() {
    report.push(Severity::Error, subject, "missing name");
  }
  if c.location.trim().is_empty() {
    report.push(Severity::Error, subject, "missing location");
  }
  if !LATITUDE_RANGE.contains(&c.latitude) {
    report.push(Severity::Error, subject, format!("latitude {} out of range", c.latitude));
  }
  if !LONGITUDE_RANGE.contains(&c.longitude) {
    report.push(Severity::Error, subject, format!("longitude {} out of range", c.longitude));
  }
  if !c.website.is_empty() && !looks_like_url(&c.website) {
    report.push(Severity::Warning, subject, format!("website {:?} is not an http(s) URL", c.website));
  }
  if c.resources.is_empty() {
    report.push(Severity::Warning, subject, "no resources listed");
  }
}

fn check_resource(report: &mut Report, college: &str, r: &NewResource) {
  if r.service_name.trim().is_empty() {
    report.push(Severity::Error, college, "resource with empty service_name");
    return;
  }
  let subject = format!("{college} / {}", r.service_name);

  if r.description.trim().chars().count() < MIN_DESCRIPTION_LEN {
    report.push(
      Severity::Warning,
      &subject,
      format!("description shorter than {MIN_DESCRIPTION_LEN} characters"),
    );
  }
  if !r.has_contact() {
    report.push(Severity::Warning, &subject, "no contact email, phone or website");
  }
  if !r.contact_email.is_empty() && !looks_like_email(&r.contact_email) {
    report.push(Severity::Warning, &subject, format!("malformed email {:?}", r.contact_email));
  }
  if !r.contact_phone.is_empty() && !looks_like_phone(&r.contact_phone) {
    report.push(Severity::Warning, &subject, format!("malformed phone {:?}", r.contact_phone));
  }
  if !r.contact_website.is_empty() && !looks_like_url(&r.contact_website) {
    report.push(
      Severity::Warning,
      &subject,
      format!("contact website {:?} is not an http(s) URL", r.contact_website),
    );
  }
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| compile(r"^[\w.-]+@[\w.-]+\.\w+$"));
static PHONE_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| compile(r"[\s\-().]"));
static PHONE_DIGITS: LazyLock<Regex> = LazyLock::new(|| compile(r"^\d{10,}$"));
/// The whole value must be a scheme plus dotted host, with an optional port
/// and path.
static URL: LazyLock<Regex> =
  LazyLock::new(|| compile(r"(?i)^https?://[\w-]+(\.[\w-]+)+(:\d+)?([/?#]\S*)?$"));

fn compile(pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern {pattern:?}: {e}"))
}

fn looks_like_email(s: &str) -> bool { EMAIL.is_match(s.trim()) }

/// At least 10 digits once spaces, dashes, dots and parentheses are removed.
fn looks_like_phone(s: &str) -> bool {
  PHONE_DIGITS.is_match(&PHONE_SEPARATORS.replace_all(s.trim(), ""))
}

fn looks_like_url(s: &str) -> bool { URL.is_match(s.trim()) }

#[cfg(test)]
mod tests {
  use super::*;

  fn good_resource() -> NewResource {
    NewResource {
      description: "Free, confidential counseling for enrolled students.".into(),
      contact_email: "counseling@kenyon.edu".into(),
      contact_phone: "(740) 427-5811".into(),
      contact_website: "https://www.kenyon.edu/counseling".into(),
      ..NewResource::new("Counseling Center")
    }
  }

  fn good_college() -> NewCollege {
    NewCollege::new("Kenyon College", "Gambier, OH", 40.3756, -82.3971)
      .with_website("https://www.kenyon.edu")
      .with_resource(good_resource())
  }

  #[test]
  fn clean_fixture_has_no_findings() {
    let report = check(&[good_college()]);
    assert_eq!(report.colleges, 1);
    assert_eq!(report.resources, 1);
    assert!(report.findings.is_empty(), "{:?}", report.findings);
  }

  #[test]
  fn missing_fields_and_bad_coordinates_are_errors() {
    let mut c = good_college();
    c.name = String::new();
    c.location = " ".into();
    c.latitude = 91.0;
    c.longitude = -181.0;

    let report = check(&[c]);
    assert!(report.has_errors());
    assert_eq!(report.errors().count(), 4);
    assert!(report.errors().all(|f| f.subject == "college #1"));
  }

  #[test]
  fn empty_service_name_is_an_error() {
    let c = good_college().with_resource(NewResource::new(""));
    let report = check(&[c]);
    assert_eq!(report.errors().count(), 1);
    assert_eq!(report.resources, 2);
  }

  #[test]
  fn thin_resource_only_warns() {
    let c = good_college().with_resource(NewResource::new("Library"));
    let report = check(&[c]);
    assert!(!report.has_errors());
    let messages: Vec<_> = report.warnings().map(|f| f.message.as_str()).collect();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("description shorter"));
    assert_eq!(messages[1], "no contact email, phone or website");
  }

  #[test]
  fn college_without_resources_warns() {
    let c = NewCollege::new("Denison University", "Granville, OH", 40.07, -82.52);
    let report = check(&[c]);
    assert!(!report.has_errors());
    assert_eq!(report.warnings().count(), 1);
  }

  #[test]
  fn malformed_contacts_warn() {
    let r = NewResource {
      contact_email: "nobody-at-example".into(),
      contact_phone: "call us".into(),
      contact_website: "www.example.com".into(),
      ..good_resource()
    };
    let c = NewCollege::new("Oberlin College", "Oberlin, OH", 41.29, -82.22).with_resource(r);
    let report = check(&[c]);
    assert!(!report.has_errors());
    assert_eq!(report.warnings().count(), 3);
  }

  #[test]
  fn format_checks() {
    assert!(looks_like_email("a@b.edu"));
    assert!(looks_like_email("first.last@student.uc.edu"));
    assert!(!looks_like_email("a@b"));
    assert!(!looks_like_email("@b.edu"));
    assert!(!looks_like_email("a b@c.d"));

    assert!(looks_like_phone("(614) 292-5766"));
    assert!(looks_like_phone("513.556.0648"));
    assert!(!looks_like_phone("555-1234"));
    assert!(!looks_like_phone("+1 614-292-5766"));
    assert!(!looks_like_phone("614-CALL-NOW"));

    assert!(looks_like_url("https://osu.edu/"));
    assert!(looks_like_url("HTTPS://www.uc.edu/campus-life/caps.html"));
    assert!(looks_like_url("http://localhost.test:8080/health?x=1"));
    assert!(!looks_like_url("ftp://osu.edu"));
    assert!(!looks_like_url("https://exa mple.com"));
    assert!(!looks_like_url("http://."));
    assert!(!looks_like_url("www.example.com"));
  }

  #[test]
  fn shipped_starter_fixture_is_clean() {
    let json = include_str!("../../../seed/starter_colleges.json");
    let colleges = campuscare_core::fixture::parse_colleges(json).unwrap();
    let report = check(&colleges);
    assert_eq!(report.colleges, 10);
    assert!(report.findings.is_empty(), "{:?}", report.findings);
  }
}
