//! Builds the dynamic `UPDATE` statement for a partial identity update.

use ident_core::identity::{IdentityPatch, PatchValue};
use rusqlite::types::Value;

use crate::{
  Result,
  encode::{encode_dob, encode_meta},
};

/// A ready-to-execute `UPDATE` with its positional parameters.
#[derive(Debug)]
pub struct UpdateStatement {
  pub sql:    String,
  pub params: Vec<Value>,
}

/// `SET` columns follow the patch's canonical field order with placeholders
/// numbered from `?1`; the identifier binds to the last placeholder.
///
/// Returns `Ok(None)` when the patch carries no fields.
pub fn build_update(id: &str, patch: &IdentityPatch) -> Result<Option<UpdateStatement>> {
  let fields = patch.present_fields();
  if fields.is_empty() {
    return Ok(None);
  }

  let mut assignments = Vec::with_capacity(fields.len());
  let mut params = Vec::with_capacity(fields.len() + 1);

  for (column, value) in fields {
    params.push(match value {
      PatchValue::Text(s) => Value::Text(s.to_owned()),
      PatchValue::Date(d) => Value::Text(encode_dob(d)),
      PatchValue::Metadata(m) => Value::Text(encode_meta(Some(m))?),
    });
    assignments.push(format!("{column} = ?{}", params.len()));
  }

  params.push(Value::Text(id.to_owned()));
  let sql = format!(
    "UPDATE identity SET {} WHERE identity_id = ?{}",
    assignments.join(", "),
    params.len(),
  );

  Ok(Some(UpdateStatement { sql, params }))
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use ident_core::identity::Metadata;

  use super::*;

  #[test]
  fn empty_patch_builds_nothing() {
    assert!(build_update("idt_1", &IdentityPatch::default()).unwrap().is_none());
  }

  #[test]
  fn placeholders_are_sequential_with_id_last() {
    let patch = IdentityPatch::default()
      .city("Abuja")
      .last_name("Okafor")
      .dob(NaiveDate::from_ymd_opt(1988, 2, 29).unwrap());

    let stmt = build_update("idt_1", &patch).unwrap().unwrap();
    assert_eq!(
      stmt.sql,
      "UPDATE identity SET last_name = ?1, dob = ?2, city = ?3 WHERE identity_id = ?4"
    );
    assert_eq!(stmt.params, [
      Value::Text("Okafor".into()),
      Value::Text("1988-02-29".into()),
      Value::Text("Abuja".into()),
      Value::Text("idt_1".into()),
    ]);
  }

  #[test]
  fn metadata_is_serialized_last() {
    let mut meta = Metadata::new();
    meta.insert("source".into(), "mobile".into());
    let patch = IdentityPatch::default().meta_data(meta).identity_type("individual");

    let stmt = build_update("idt_2", &patch).unwrap().unwrap();
    assert_eq!(
      stmt.sql,
      "UPDATE identity SET identity_type = ?1, meta_data = ?2 WHERE identity_id = ?3"
    );
    assert_eq!(stmt.params[1], Value::Text(r#"{"source":"mobile"}"#.into()));
  }

  #[test]
  fn empty_metadata_still_replaces() {
    let patch = IdentityPatch::default().meta_data(Metadata::new());
    let stmt = build_update("idt_3", &patch).unwrap().unwrap();
    assert_eq!(stmt.params[0], Value::Text("{}".into()));
  }
}
