//! [`SqliteStore`]: the SQLite implementation of [`DirectoryStore`].

use std::{collections::HashMap, path::Path};

use rusqlite::OptionalExtension as _;
use tracing::debug;

use campuscare_core::{
  Error as CoreError,
  college::{College, CollegeUpdate, ImportSummary, NewCollege},
  resource::{NewResource, Resource},
  store::DirectoryStore,
  validate,
};

use crate::{
  Result,
  encode::{
    COLLEGE_COLUMNS, RESOURCE_COLUMNS, RawCollege, RawResource, advance, decode_dt_sql,
    encode_dt, now,
  },
  error::{is_foreign_key_violation, is_unique_violation},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Campuscare directory backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of stored resources across all colleges.
  pub async fn resource_count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM resources", [], |r| r.get(0))?))
      .await?;
    Ok(n as u64)
  }
}

// ─── Connection-level helpers ────────────────────────────────────────────────
//
// These run inside a `Connection::call` closure, usually on an open
// transaction (which derefs to `Connection`).

fn insert_resource(
  conn:       &rusqlite::Connection,
  college_id: i64,
  r:          &NewResource,
  at:         &str,
) -> rusqlite::Result<i64> {
  let mut stmt = conn.prepare_cached(
    "INSERT INTO resources (
       college_id, service_name, description, contact_email, contact_phone,
       contact_website, department, office_hours, location, freshman_notes,
       created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
  )?;
  stmt.execute(rusqlite::params![
    college_id,
    r.service_name,
    r.description,
    r.contact_email,
    r.contact_phone,
    r.contact_website,
    r.department,
    r.office_hours,
    r.location,
    r.freshman_notes,
    at,
  ])?;
  Ok(conn.last_insert_rowid())
}

/// Insert a college row and every resource attached to it.
fn insert_college(conn: &rusqlite::Connection, c: &NewCollege, at: &str) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO colleges (name, location, latitude, longitude, website, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    rusqlite::params![c.name, c.location, c.latitude, c.longitude, c.website, at],
  )?;
  let id = conn.last_insert_rowid();
  for r in &c.resources {
    insert_resource(conn, id, r, at)?;
  }
  Ok(id)
}

fn select_resources(conn: &rusqlite::Connection, college_id: i64) -> rusqlite::Result<Vec<RawResource>> {
  let mut stmt = conn.prepare_cached(&format!(
    "SELECT {RESOURCE_COLUMNS} FROM resources WHERE college_id = ?1 ORDER BY id"
  ))?;
  stmt
    .query_map([college_id], RawResource::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()
}

/// Load one college with its resources populated.
fn select_college(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Option<RawCollege>> {
  let college = conn
    .query_row(
      &format!("SELECT {COLLEGE_COLUMNS} FROM colleges WHERE id = ?1"),
      [id],
      RawCollege::from_row,
    )
    .optional()?;

  match college {
    Some(mut c) => {
      c.resources = select_resources(conn, id)?;
      Ok(Some(c))
    }
    None => Ok(None),
  }
}

/// Load every college, then every resource, and stitch them together.
fn select_all_colleges(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<RawCollege>> {
  let mut colleges = conn
    .prepare(&format!("SELECT {COLLEGE_COLUMNS} FROM colleges ORDER BY id"))?
    .query_map([], RawCollege::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut by_college: HashMap<i64, Vec<RawResource>> = HashMap::new();
  let mut stmt = conn.prepare(&format!("SELECT {RESOURCE_COLUMNS} FROM resources ORDER BY id"))?;
  for raw in stmt.query_map([], RawResource::from_row)? {
    let raw = raw?;
    by_college.entry(raw.college_id).or_default().push(raw);
  }

  for c in &mut colleges {
    c.resources = by_college.remove(&c.id).unwrap_or_default();
  }
  Ok(colleges)
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = crate::Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_colleges_with_resources(&self) -> Result<Vec<College>> {
    let raws = self.conn.call(|conn| Ok(select_all_colleges(conn)?)).await?;
    raws.into_iter().map(RawCollege::into_college).collect()
  }

  async fn get_college_with_resources(&self, id: i64) -> Result<Option<College>> {
    let raw = self.conn.call(move |conn| Ok(select_college(conn, id)?)).await?;
    raw.map(RawCollege::into_college).transpose()
  }

  async fn list_resources_for_college(&self, college_id: i64) -> Result<Vec<Resource>> {
    let raws = self
      .conn
      .call(move |conn| Ok(select_resources(conn, college_id)?))
      .await?;
    raws.into_iter().map(RawResource::into_resource).collect()
  }

  async fn college_count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM colleges", [], |r| r.get(0))?))
      .await?;
    Ok(n as u64)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_college(&self, input: NewCollege) -> Result<College> {
    validate::new_college(&input)?;

    let name = input.name.clone();
    let at = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let id = insert_college(&tx, &input, &at)?;
        let raw = select_college(&tx, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(raw)
      })
      .await
      .map_err(|e| {
        if is_unique_violation(&e) {
          CoreError::DuplicateCollegeName(name).into()
        } else {
          crate::Error::from(e)
        }
      })?;

    debug!(id = raw.id, name = %raw.name, resources = raw.resources.len(), "created college");
    raw.into_college()
  }

  async fn create_resource(&self, input: NewResource) -> Result<Resource> {
    validate::resource(&input)?;

    let college_id = input.college_id;
    let at = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let id = insert_resource(conn, college_id, &input, &at)?;
        Ok(conn.query_row(
          &format!("SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = ?1"),
          [id],
          RawResource::from_row,
        )?)
      })
      .await
      .map_err(|e| {
        if is_foreign_key_violation(&e) {
          CoreError::MissingCollege(college_id).into()
        } else {
          crate::Error::from(e)
        }
      })?;

    debug!(id = raw.id, college_id, "created resource");
    raw.into_resource()
  }

  async fn update_college(&self, update: CollegeUpdate) -> Result<College> {
    validate::college_update(&update)?;

    let id = update.id;
    let name = update.name.clone();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let prior: Option<String> = tx
          .query_row("SELECT updated_at FROM colleges WHERE id = ?1", [id], |r| r.get(0))
          .optional()?;
        let Some(prior) = prior else {
          return Ok(None);
        };

        let at = encode_dt(advance(decode_dt_sql(&prior)?));
        tx.execute(
          "UPDATE colleges
             SET name = ?2, location = ?3, latitude = ?4, longitude = ?5,
                 website = ?6, updated_at = ?7
           WHERE id = ?1",
          rusqlite::params![
            id,
            update.name,
            update.location,
            update.latitude,
            update.longitude,
            update.website,
            at,
          ],
        )?;
        let raw = select_college(&tx, id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await
      .map_err(|e| {
        if is_unique_violation(&e) {
          CoreError::DuplicateCollegeName(name).into()
        } else {
          crate::Error::from(e)
        }
      })?
      .ok_or(CoreError::CollegeNotFound(id))?;

    debug!(id, "updated college");
    raw.into_college()
  }

  async fn delete_college(&self, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM colleges WHERE id = ?1", [id])?))
      .await?;

    debug!(id, removed, "delete college");
    Ok(removed > 0)
  }

  async fn bulk_import(&self, colleges: Vec<NewCollege>) -> Result<ImportSummary> {
    validate::batch(&colleges)?;

    let inserted_at = encode_dt(now());

    let summary = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut summary = ImportSummary::default();

        for incoming in &colleges {
          let existing: Option<(i64, String)> = tx
            .query_row(
              "SELECT id, updated_at FROM colleges WHERE name = ?1",
              [&incoming.name],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;

          match existing {
            Some((id, prior)) => {
              let at = encode_dt(advance(decode_dt_sql(&prior)?));
              tx.execute(
                "UPDATE colleges
                   SET location = ?2, latitude = ?3, longitude = ?4,
                       website = ?5, updated_at = ?6
                 WHERE id = ?1",
                rusqlite::params![
                  id,
                  incoming.location,
                  incoming.latitude,
                  incoming.longitude,
                  incoming.website,
                  at,
                ],
              )?;
              tx.execute("DELETE FROM resources WHERE college_id = ?1", [id])?;
              for r in &incoming.resources {
                insert_resource(&tx, id, r, &at)?;
              }
              summary.updated += 1;
            }
            None => {
              insert_college(&tx, incoming, &inserted_at)?;
              summary.inserted += 1;
            }
          }
          summary.resources += incoming.resources.len();
        }

        tx.commit()?;
        Ok(summary)
      })
      .await?;

    debug!(
      inserted = summary.inserted,
      updated = summary.updated,
      resources = summary.resources,
      "bulk import committed"
    );
    Ok(summary)
  }
}
