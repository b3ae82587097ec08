//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use ident_core::{
  ErrorKind,
  identity::{IdentityPatch, Metadata, NewIdentity},
  store::IdentityStore,
};
use serde_json::json;

use crate::{SqliteStore, StoreOptions};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn person(first: &str, last: &str) -> NewIdentity {
  NewIdentity {
    identity_type: "individual".into(),
    first_name: first.into(),
    last_name: last.into(),
    gender: "female".into(),
    dob: NaiveDate::from_ymd_opt(1990, 4, 1),
    email_address: format!("{}@example.com", first.to_lowercase()),
    phone_number: "+2348012345678".into(),
    nationality: "NG".into(),
    street: "12 Marina Rd".into(),
    country: "Nigeria".into(),
    state: "Lagos".into(),
    post_code: "101241".into(),
    city: "Lagos".into(),
    meta_data: Some(meta(json!({ "source": "onboarding", "kyc": { "level": 1 } }))),
    ..Default::default()
  }
}

fn organization(name: &str) -> NewIdentity {
  NewIdentity {
    identity_type: "organization".into(),
    organization_name: name.into(),
    category: "fintech".into(),
    ..Default::default()
  }
}

fn meta(value: serde_json::Value) -> Metadata {
  value.as_object().cloned().expect("object")
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_id_and_timestamp() {
  let s = store().await;
  let started = Utc::now();

  let a = s.create_identity(person("Ada", "Lovelace")).await.unwrap();
  let b = s.create_identity(person("Ada", "Lovelace")).await.unwrap();

  assert!(a.identity_id.starts_with("idt_"), "{}", a.identity_id);
  assert_ne!(a.identity_id, b.identity_id);
  assert!(a.created_at >= started);
  assert_eq!(a.first_name, "Ada");
  assert_eq!(a.meta_data.as_ref().unwrap()["source"], json!("onboarding"));
}

#[tokio::test]
async fn create_and_get_roundtrip() {
  let s = store().await;
  let created = s.create_identity(person("Chidi", "Okeke")).await.unwrap();

  let fetched = s.get_identity_by_id(&created.identity_id).await.unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn identity_without_metadata_roundtrips_as_none() {
  let s = store().await;
  let created = s.create_identity(organization("Acme")).await.unwrap();

  let fetched = s.get_identity_by_id(&created.identity_id).await.unwrap();
  assert!(fetched.meta_data.is_none());
  assert!(fetched.dob.is_none());
  assert_eq!(fetched.organization_name, "Acme");
}

// ─── Get ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_is_not_found() {
  let s = store().await;
  let err = s.get_identity_by_id("nonexistent").await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert_eq!(err.message(), "Identity with ID 'nonexistent' not found");
}

#[tokio::test]
async fn get_with_corrupt_metadata_is_internal() {
  let s = store().await;
  let created = s.create_identity(organization("Broken")).await.unwrap();

  let id = created.identity_id.clone();
  s.conn
    .call(move |conn| {
      conn.execute(
        "UPDATE identity SET meta_data = '{oops' WHERE identity_id = ?1",
        rusqlite::params![id],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s.get_identity_by_id(&created.identity_id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InternalServer);
  assert_eq!(err.message(), "Failed to unmarshal metadata");
}

#[tokio::test]
async fn get_times_out_when_connection_is_busy() {
  let s = SqliteStore::open_in_memory_with_options(StoreOptions {
    read_timeout: Duration::from_millis(50),
  })
  .await
  .unwrap();
  let created = s.create_identity(organization("Slow")).await.unwrap();

  // Occupy the connection thread so the read queues behind it.
  let conn = s.conn.clone();
  let blocker = tokio::spawn(async move {
    conn
      .call(|_| {
        std::thread::sleep(Duration::from_millis(400));
        Ok(())
      })
      .await
  });
  tokio::time::sleep(Duration::from_millis(20)).await;

  let err = s.get_identity_by_id(&created.identity_id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InternalServer);

  blocker.await.unwrap().unwrap();
  assert!(s.get_identity_by_id(&created.identity_id).await.is_ok());
}

// ─── Get all ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_all_empty_store() {
  let s = store().await;
  assert!(s.get_all_identities().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_all_newest_first() {
  let s = store().await;
  let first = s.create_identity(person("One", "A")).await.unwrap();
  let second = s.create_identity(organization("Two")).await.unwrap();
  let third = s.create_identity(person("Three", "C")).await.unwrap();

  let all = s.get_all_identities().await.unwrap();
  let ids: Vec<_> = all.iter().map(|i| i.identity_id.as_str()).collect();
  assert_eq!(ids, [
    third.identity_id.as_str(),
    second.identity_id.as_str(),
    first.identity_id.as_str(),
  ]);
  assert_eq!(all[0], third);
}

#[tokio::test]
async fn get_all_aborts_on_one_bad_row() {
  let s = store().await;
  s.create_identity(organization("Fine")).await.unwrap();
  let bad = s.create_identity(organization("Bad")).await.unwrap();

  let id = bad.identity_id.clone();
  s.conn
    .call(move |conn| {
      conn.execute(
        "UPDATE identity SET created_at = 'yesterday' WHERE identity_id = ?1",
        rusqlite::params![id],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s.get_all_identities().await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InternalServer);
  assert_eq!(err.message(), "Failed to scan identity data");
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn partial_update_preserves_untouched_fields() {
  let s = store().await;
  let created = s.create_identity(person("A", "B")).await.unwrap();

  s.update_identity(&created.identity_id, &IdentityPatch::default().first_name("C"))
    .await
    .unwrap();

  let fetched = s.get_identity_by_id(&created.identity_id).await.unwrap();
  assert_eq!(fetched.first_name, "C");
  assert_eq!(fetched.last_name, "B");
  assert_eq!(fetched.created_at, created.created_at);
  assert_eq!(fetched.meta_data, created.meta_data);
}

#[tokio::test]
async fn update_from_identity_ignores_zero_values() {
  let s = store().await;
  let created = s.create_identity(person("A", "B")).await.unwrap();

  let mut changes = created.clone();
  changes.first_name = "C".into();
  changes.last_name = String::new();
  changes.dob = None;
  changes.meta_data = None;

  s.update_identity(&created.identity_id, &IdentityPatch::from(&changes))
    .await
    .unwrap();

  let fetched = s.get_identity_by_id(&created.identity_id).await.unwrap();
  assert_eq!(fetched.first_name, "C");
  assert_eq!(fetched.last_name, "B");
  assert_eq!(fetched.dob, created.dob);
  assert!(fetched.meta_data.is_some());
}

#[tokio::test]
async fn explicit_empty_string_clears_field() {
  let s = store().await;
  let created = s.create_identity(person("A", "B")).await.unwrap();

  s.update_identity(&created.identity_id, &IdentityPatch::default().street(""))
    .await
    .unwrap();

  let fetched = s.get_identity_by_id(&created.identity_id).await.unwrap();
  assert_eq!(fetched.street, "");
  assert_eq!(fetched.city, "Lagos");
}

#[tokio::test]
async fn metadata_update_replaces_whole_map() {
  let s = store().await;
  let created = s.create_identity(person("A", "B")).await.unwrap();

  let replacement = meta(json!({ "tier": "gold" }));
  s.update_identity(
    &created.identity_id,
    &IdentityPatch::default().meta_data(replacement.clone()),
  )
  .await
  .unwrap();

  let fetched = s.get_identity_by_id(&created.identity_id).await.unwrap();
  assert_eq!(fetched.meta_data, Some(replacement));
}

#[tokio::test]
async fn update_dob() {
  let s = store().await;
  let created = s.create_identity(organization("Acme")).await.unwrap();
  let dob = NaiveDate::from_ymd_opt(2001, 9, 11).unwrap();

  s.update_identity(&created.identity_id, &IdentityPatch::default().dob(dob))
    .await
    .unwrap();

  let fetched = s.get_identity_by_id(&created.identity_id).await.unwrap();
  assert_eq!(fetched.dob, Some(dob));
}

#[tokio::test]
async fn empty_update_is_bad_request() {
  let s = store().await;
  let created = s.create_identity(person("A", "B")).await.unwrap();

  let err = s
    .update_identity(&created.identity_id, &IdentityPatch::default())
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::BadRequest);

  let fetched = s.get_identity_by_id(&created.identity_id).await.unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_missing_is_not_found() {
  let s = store().await;
  s.create_identity(person("A", "B")).await.unwrap();

  let err = s
    .update_identity("nonexistent", &IdentityPatch::default().city("Kano"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);

  let all = s.get_all_identities().await.unwrap();
  assert_eq!(all[0].city, "Lagos");
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_is_terminal() {
  let s = store().await;
  let created = s.create_identity(person("A", "B")).await.unwrap();

  s.delete_identity(&created.identity_id).await.unwrap();

  let err = s.get_identity_by_id(&created.identity_id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);

  let err = s.delete_identity(&created.identity_id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_missing_leaves_others() {
  let s = store().await;
  s.create_identity(organization("Keep")).await.unwrap();

  let err = s.delete_identity("nonexistent").await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert_eq!(s.get_all_identities().await.unwrap().len(), 1);
}
