//! Encoding and decoding helpers between [`Identity`] and the plain-text
//! representations stored in SQLite columns.
//!
//! `created_at` is stored as RFC 3339 UTC with a fixed nanosecond width so
//! that lexical order matches chronological order. `dob` is an ISO calendar
//! date. Metadata is compact JSON; an absent map is stored as `null`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use ident_core::identity::{Identity, Metadata};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Date of birth ───────────────────────────────────────────────────────────

pub fn encode_dob(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_dob(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("dob {s:?}: {e}")))
}

// ─── Metadata ────────────────────────────────────────────────────────────────

pub fn encode_meta(meta: Option<&Metadata>) -> Result<String> {
  Ok(serde_json::to_string(&meta)?)
}

pub fn decode_meta(s: &str) -> Result<Option<Metadata>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT`; order matches [`RawIdentity::from_row`].
macro_rules! identity_columns {
  () => {
    "identity_id, identity_type, first_name, last_name, other_names, gender, \
     dob, email_address, phone_number, nationality, organization_name, \
     category, street, country, state, post_code, city, created_at, meta_data"
  };
}

pub const SELECT_BY_ID: &str = concat!(
  "SELECT ",
  identity_columns!(),
  " FROM identity WHERE identity_id = ?1"
);

pub const SELECT_ALL: &str = concat!(
  "SELECT ",
  identity_columns!(),
  " FROM identity ORDER BY created_at DESC, rowid DESC"
);

pub const INSERT: &str = concat!(
  "INSERT INTO identity (",
  identity_columns!(),
  ") VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, \
   ?15, ?16, ?17, ?18, ?19)"
);

/// Raw column values read directly from an `identity` row.
pub struct RawIdentity {
  pub identity_id:       String,
  pub identity_type:     String,
  pub first_name:        String,
  pub last_name:         String,
  pub other_names:       String,
  pub gender:            String,
  pub dob:               Option<String>,
  pub email_address:     String,
  pub phone_number:      String,
  pub nationality:       String,
  pub organization_name: String,
  pub category:          String,
  pub street:            String,
  pub country:           String,
  pub state:             String,
  pub post_code:         String,
  pub city:              String,
  pub created_at:        String,
  pub meta_data:         String,
}

impl RawIdentity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      identity_id:       row.get(0)?,
      identity_type:     row.get(1)?,
      first_name:        row.get(2)?,
      last_name:         row.get(3)?,
      other_names:       row.get(4)?,
      gender:            row.get(5)?,
      dob:               row.get(6)?,
      email_address:     row.get(7)?,
      phone_number:      row.get(8)?,
      nationality:       row.get(9)?,
      organization_name: row.get(10)?,
      category:          row.get(11)?,
      street:            row.get(12)?,
      country:           row.get(13)?,
      state:             row.get(14)?,
      post_code:         row.get(15)?,
      city:              row.get(16)?,
      created_at:        row.get(17)?,
      meta_data:         row.get(18)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    let dob = self.dob.as_deref().map(decode_dob).transpose()?;
    let created_at = decode_dt(&self.created_at)?;
    let meta_data = decode_meta(&self.meta_data)?;

    Ok(Identity {
      identity_id: self.identity_id,
      identity_type: self.identity_type,
      first_name: self.first_name,
      last_name: self.last_name,
      other_names: self.other_names,
      gender: self.gender,
      dob,
      email_address: self.email_address,
      phone_number: self.phone_number,
      nationality: self.nationality,
      organization_name: self.organization_name,
      category: self.category,
      street: self.street,
      country: self.country,
      state: self.state,
      post_code: self.post_code,
      city: self.city,
      created_at,
      meta_data,
    })
  }
}
