//! Identity types — a person or organization record with contact, address
//! and open metadata fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Caller-defined key/value annotation. Opaque to the store; persisted as
/// JSON text.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

// ─── Identity ────────────────────────────────────────────────────────────────

/// A persisted identity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
  /// Store-assigned, `idt_`-prefixed; never changes after creation.
  pub identity_id:       String,
  /// Discriminates person vs. organization (free text, e.g. `"individual"`).
  pub identity_type:     String,
  pub first_name:        String,
  pub last_name:         String,
  pub other_names:       String,
  pub gender:            String,
  pub dob:               Option<NaiveDate>,
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
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:        DateTime<Utc>,
  pub meta_data:         Option<Metadata>,
}

// ─── NewIdentity ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::IdentityStore::create_identity`].
/// `identity_id` and `created_at` are always set by the store; they are not
/// accepted from callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewIdentity {
  pub identity_type:     String,
  pub first_name:        String,
  pub last_name:         String,
  pub other_names:       String,
  pub gender:            String,
  pub dob:               Option<NaiveDate>,
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
  pub meta_data:         Option<Metadata>,
}

impl NewIdentity {
  /// Attach the store-assigned fields.
  pub fn into_identity(
    self,
    identity_id: String,
    created_at: DateTime<Utc>,
  ) -> Identity {
    Identity {
      identity_id,
      identity_type: self.identity_type,
      first_name: self.first_name,
      last_name: self.last_name,
      other_names: self.other_names,
      gender: self.gender,
      dob: self.dob,
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
      meta_data: self.meta_data,
    }
  }
}

// ─── IdentityPatch ───────────────────────────────────────────────────────────

/// A partial update. `Some` means "write this value"; `None` leaves the stored
/// column untouched.
///
/// `Some(String::new())` clears a text column. `meta_data`, when present,
/// replaces the stored map wholesale; there is no key-level merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityPatch {
  pub identity_type:     Option<String>,
  pub first_name:        Option<String>,
  pub last_name:         Option<String>,
  pub other_names:       Option<String>,
  pub gender:            Option<String>,
  pub dob:               Option<NaiveDate>,
  pub email_address:     Option<String>,
  pub phone_number:      Option<String>,
  pub nationality:       Option<String>,
  pub organization_name: Option<String>,
  pub category:          Option<String>,
  pub street:            Option<String>,
  pub country:           Option<String>,
  pub state:             Option<String>,
  pub post_code:         Option<String>,
  pub city:              Option<String>,
  pub meta_data:         Option<Metadata>,
}

/// A single present value in an [`IdentityPatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatchValue<'a> {
  Text(&'a str),
  Date(NaiveDate),
  Metadata(&'a Metadata),
}

macro_rules! patch_setters {
  ($($field:ident),* $(,)?) => {
    $(
      pub fn $field(mut self, value: impl Into<String>) -> Self {
        self.$field = Some(value.into());
        self
      }
    )*
  };
}

impl IdentityPatch {
  patch_setters!(
    identity_type,
    first_name,
    last_name,
    other_names,
    gender,
    email_address,
    phone_number,
    nationality,
    organization_name,
    category,
    street,
    country,
    state,
    post_code,
    city,
  );

  pub fn dob(mut self, dob: NaiveDate) -> Self {
    self.dob = Some(dob);
    self
  }

  pub fn meta_data(mut self, meta_data: Metadata) -> Self {
    self.meta_data = Some(meta_data);
    self
  }

  /// The present fields as `(field_name, value)` pairs, in the record's
  /// canonical field order. Field names match the storage column names.
  pub fn present_fields(&self) -> Vec<(&'static str, PatchValue<'_>)> {
    fn text<'a>(
      name: &'static str,
      value: &'a Option<String>,
    ) -> Option<(&'static str, PatchValue<'a>)> {
      value.as_deref().map(|s| (name, PatchValue::Text(s)))
    }

    [
      text("identity_type", &self.identity_type),
      text("first_name", &self.first_name),
      text("last_name", &self.last_name),
      text("other_names", &self.other_names),
      text("gender", &self.gender),
      self.dob.map(|d| ("dob", PatchValue::Date(d))),
      text("email_address", &self.email_address),
      text("phone_number", &self.phone_number),
      text("nationality", &self.nationality),
      text("organization_name", &self.organization_name),
      text("category", &self.category),
      text("street", &self.street),
      text("country", &self.country),
      text("state", &self.state),
      text("post_code", &self.post_code),
      text("city", &self.city),
      self.meta_data.as_ref().map(|m| ("meta_data", PatchValue::Metadata(m))),
    ]
    .into_iter()
    .flatten()
    .collect()
  }

  pub fn is_empty(&self) -> bool { self.present_fields().is_empty() }
}

/// Treats empty strings and a missing `dob` as "not supplied"; `meta_data` is
/// carried whenever it is `Some`.
impl From<&Identity> for IdentityPatch {
  fn from(identity: &Identity) -> Self {
    let non_empty = |s: &String| (!s.is_empty()).then(|| s.clone());
    Self {
      identity_type:     non_empty(&identity.identity_type),
      first_name:        non_empty(&identity.first_name),
      last_name:         non_empty(&identity.last_name),
      other_names:       non_empty(&identity.other_names),
      gender:            non_empty(&identity.gender),
      dob:               identity.dob,
      email_address:     non_empty(&identity.email_address),
      phone_number:      non_empty(&identity.phone_number),
      nationality:       non_empty(&identity.nationality),
      organization_name: non_empty(&identity.organization_name),
      category:          non_empty(&identity.category),
      street:            non_empty(&identity.street),
      country:           non_empty(&identity.country),
      state:             non_empty(&identity.state),
      post_code:         non_empty(&identity.post_code),
      city:              non_empty(&identity.city),
      meta_data:         identity.meta_data.clone(),
    }
  }
}
