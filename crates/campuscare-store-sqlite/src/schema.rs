//! SQL schema for the Campuscare SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS colleges (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    location    TEXT NOT NULL,
    latitude    REAL NOT NULL CHECK (latitude  BETWEEN -90  AND 90),
    longitude   REAL NOT NULL CHECK (longitude BETWEEN -180 AND 180),
    website     TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC, microseconds
    updated_at  TEXT NOT NULL
);

-- The natural key for bulk import. Enforced here so concurrent inserts
-- cannot race past an application-level check.
CREATE UNIQUE INDEX IF NOT EXISTS colleges_name_idx ON colleges(name);

CREATE TABLE IF NOT EXISTS resources (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    college_id       INTEGER NOT NULL REFERENCES colleges(id) ON DELETE CASCADE,
    service_name     TEXT NOT NULL,
    description      TEXT NOT NULL DEFAULT '',
    contact_email    TEXT NOT NULL DEFAULT '',
    contact_phone    TEXT NOT NULL DEFAULT '',
    contact_website  TEXT NOT NULL DEFAULT '',
    department       TEXT NOT NULL DEFAULT '',
    office_hours     TEXT NOT NULL DEFAULT '',
    location         TEXT NOT NULL DEFAULT '',
    freshman_notes   TEXT NOT NULL DEFAULT '',
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS resources_college_idx ON resources(college_id);

PRAGMA user_version = 1;
";
