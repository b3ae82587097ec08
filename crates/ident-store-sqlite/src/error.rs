//! Error type for `ident-store-sqlite`.
//!
//! Store operations report [`ident_core::ApiError`]; this type covers opening
//! the database and the column codecs, and is attached as the source of
//! internal-server errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
