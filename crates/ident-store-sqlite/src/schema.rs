//! SQL schema for the identity SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS identity (
    identity_id       TEXT PRIMARY KEY,          -- 'idt_' + uuid v4; store-assigned
    identity_type     TEXT NOT NULL DEFAULT '',
    first_name        TEXT NOT NULL DEFAULT '',
    last_name         TEXT NOT NULL DEFAULT '',
    other_names       TEXT NOT NULL DEFAULT '',
    gender            TEXT NOT NULL DEFAULT '',
    dob               TEXT,                      -- YYYY-MM-DD or NULL
    email_address     TEXT NOT NULL DEFAULT '',
    phone_number      TEXT NOT NULL DEFAULT '',
    nationality       TEXT NOT NULL DEFAULT '',
    organization_name TEXT NOT NULL DEFAULT '',
    category          TEXT NOT NULL DEFAULT '',
    street            TEXT NOT NULL DEFAULT '',
    country           TEXT NOT NULL DEFAULT '',
    state             TEXT NOT NULL DEFAULT '',
    post_code         TEXT NOT NULL DEFAULT '',
    city              TEXT NOT NULL DEFAULT '',
    created_at        TEXT NOT NULL,             -- RFC 3339 UTC, nanosecond width
    meta_data         TEXT NOT NULL DEFAULT 'null'
);

CREATE INDEX IF NOT EXISTS identity_created_idx ON identity(created_at);

PRAGMA user_version = 1;
";
