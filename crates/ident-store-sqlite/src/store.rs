//! [`SqliteStore`] — the SQLite implementation of [`IdentityStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use ident_core::{
  ApiError,
  id::generate_identity_id,
  identity::{Identity, IdentityPatch, NewIdentity},
  store::IdentityStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{INSERT, RawIdentity, SELECT_ALL, SELECT_BY_ID, encode_dob, encode_dt, encode_meta},
  schema::SCHEMA,
  update::{UpdateStatement, build_update},
};

/// Upper bound on the read transaction behind
/// [`IdentityStore::get_identity_by_id`].
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Tunables for [`SqliteStore::open_with_options`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
  pub read_timeout: Duration,
}

impl Default for StoreOptions {
  fn default() -> Self { Self { read_timeout: DEFAULT_READ_TIMEOUT } }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An identity store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  read_timeout:    Duration,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with_options(path, StoreOptions::default()).await
  }

  pub async fn open_with_options(
    path: impl AsRef<Path>,
    options: StoreOptions,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, options).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open_in_memory_with_options(StoreOptions::default()).await
  }

  pub async fn open_in_memory_with_options(options: StoreOptions) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, options).await
  }

  pub fn read_timeout(&self) -> Duration { self.read_timeout }

  async fn init(conn: tokio_rusqlite::Connection, options: StoreOptions) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, read_timeout: options.read_timeout })
  }
}

// ─── Blocking helpers (run on the connection thread) ─────────────────────────

fn not_found(id: &str) -> ApiError {
  ApiError::not_found(format!("Identity with ID '{id}' not found"))
}

/// Classify a row-decoding failure: bad metadata JSON versus a malformed
/// column value.
fn decode_failure(e: Error) -> ApiError {
  match e {
    Error::Json(_) => ApiError::internal("Failed to unmarshal metadata", e),
    _ => ApiError::internal("Failed to scan identity data", e),
  }
}

/// Read one identity inside a transaction. Any early return drops `tx`,
/// which rolls it back.
fn select_one(conn: &mut rusqlite::Connection, id: &str) -> ident_core::Result<Identity> {
  let tx = conn
    .transaction()
    .map_err(|e| ApiError::internal("Failed to begin transaction", e))?;

  let raw = tx
    .query_row(SELECT_BY_ID, rusqlite::params![id], RawIdentity::from_row)
    .optional()
    .map_err(|e| ApiError::internal("Failed to retrieve identity", e))?
    .ok_or_else(|| not_found(id))?;

  let identity = raw.into_identity().map_err(decode_failure)?;

  tx.commit()
    .map_err(|e| ApiError::internal("Failed to commit transaction", e))?;
  Ok(identity)
}

fn select_all(conn: &rusqlite::Connection) -> ident_core::Result<Vec<Identity>> {
  let retrieve = |e: rusqlite::Error| ApiError::internal("Failed to retrieve identities", e);

  let mut stmt = conn.prepare(SELECT_ALL).map_err(retrieve)?;
  let rows = stmt.query_map([], RawIdentity::from_row).map_err(retrieve)?;

  let mut identities = Vec::new();
  for row in rows {
    let raw = row.map_err(|e| ApiError::internal("Failed to scan identity data", e))?;
    identities.push(raw.into_identity().map_err(decode_failure)?);
  }
  Ok(identities)
}

// ─── IdentityStore impl ──────────────────────────────────────────────────────

impl IdentityStore for SqliteStore {
  async fn create_identity(&self, input: NewIdentity) -> ident_core::Result<Identity> {
    let meta_json = encode_meta(input.meta_data.as_ref())
      .map_err(|e| ApiError::internal("Failed to marshal metadata", e))?;

    let identity = input.into_identity(generate_identity_id(), Utc::now());

    let row            = identity.clone();
    let dob_str        = identity.dob.map(encode_dob);
    let created_at_str = encode_dt(identity.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          INSERT,
          rusqlite::params![
            row.identity_id,
            row.identity_type,
            row.first_name,
            row.last_name,
            row.other_names,
            row.gender,
            dob_str,
            row.email_address,
            row.phone_number,
            row.nationality,
            row.organization_name,
            row.category,
            row.street,
            row.country,
            row.state,
            row.post_code,
            row.city,
            created_at_str,
            meta_json,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| ApiError::internal("Failed to create identity", e))?;

    tracing::debug!(identity_id = %identity.identity_id, "created identity");
    Ok(identity)
  }

  async fn get_identity_by_id(&self, id: &str) -> ident_core::Result<Identity> {
    let id_owned = id.to_owned();
    let read = self
      .conn
      .call(move |conn| Ok(select_one(conn, &id_owned)));

    match tokio::time::timeout(self.read_timeout, read).await {
      Ok(result) => {
        result.map_err(|e| ApiError::internal("Failed to retrieve identity", e))?
      }
      Err(elapsed) => {
        tracing::warn!(identity_id = %id, timeout = ?self.read_timeout, "identity read timed out");
        Err(ApiError::internal("Failed to retrieve identity", elapsed))
      }
    }
  }

  async fn get_all_identities(&self) -> ident_core::Result<Vec<Identity>> {
    self
      .conn
      .call(|conn| Ok(select_all(conn)))
      .await
      .map_err(|e| ApiError::internal("Failed to retrieve identities", e))?
  }

  async fn update_identity(
    &self,
    id: &str,
    patch: &IdentityPatch,
  ) -> ident_core::Result<()> {
    let UpdateStatement { sql, params } = build_update(id, patch)
      .map_err(|e| ApiError::internal("Failed to marshal metadata", e))?
      .ok_or_else(|| ApiError::bad_request("No fields provided for update"))?;

    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params_from_iter(params))?))
      .await
      .map_err(|e| ApiError::internal("Failed to update identity", e))?;

    if changed == 0 {
      tracing::warn!(identity_id = %id, "update matched no identity");
      return Err(not_found(id));
    }

    tracing::debug!(identity_id = %id, "updated identity");
    Ok(())
  }

  async fn delete_identity(&self, id: &str) -> ident_core::Result<()> {
    let id_owned = id.to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM identity WHERE identity_id = ?1",
          rusqlite::params![id_owned],
        )?)
      })
      .await
      .map_err(|e| ApiError::internal("Failed to delete identity", e))?;

    if changed == 0 {
      tracing::warn!(identity_id = %id, "delete matched no identity");
      return Err(not_found(id));
    }

    tracing::debug!(identity_id = %id, "deleted identity");
    Ok(())
  }
}
