//! The `IdentityStore` trait.
//!
//! Implemented by storage backends (e.g. `ident-store-sqlite`). Every method
//! reports failures through the [`ApiError`](crate::ApiError) taxonomy.

use std::future::Future;

use crate::{
  Result,
  identity::{Identity, IdentityPatch, NewIdentity},
};

/// CRUD access to identity records.
///
/// Each call is an independent unit of work; implementations hold no mutable
/// state between calls beyond their connection handle. All methods return
/// `Send` futures so the trait can be used from multi-threaded runtimes.
pub trait IdentityStore: Send + Sync {
  /// Persist a new identity. The store assigns `identity_id` and
  /// `created_at` and returns the populated record.
  fn create_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Identity>> + Send + '_;

  /// Fetch one identity. `NotFound` if `id` does not exist.
  fn get_identity_by_id<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Identity>> + Send + 'a;

  /// Every identity, most recently created first. An empty store yields an
  /// empty `Vec`.
  fn get_all_identities(
    &self,
  ) -> impl Future<Output = Result<Vec<Identity>>> + Send + '_;

  /// Apply the present fields of `patch` to identity `id`.
  ///
  /// `BadRequest` if the patch carries no fields, `NotFound` if no row
  /// matched.
  fn update_identity<'a>(
    &'a self,
    id: &'a str,
    patch: &'a IdentityPatch,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Irreversibly delete identity `id`. `NotFound` if no row matched.
  fn delete_identity<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}
