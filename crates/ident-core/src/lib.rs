//! Core types and trait definitions for the identity store.
//!
//! This crate is deliberately free of database dependencies. Storage backends
//! implement [`store::IdentityStore`]; callers depend on the trait.

// Native `async fn` in traits; the trait spells out `Send` bounds itself.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod id;
pub mod identity;
pub mod store;

pub use error::{ApiError, ErrorKind, Result};
