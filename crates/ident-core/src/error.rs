//! The three-way error taxonomy shared by every store operation.
//!
//! Callers inspect [`ApiError::kind`] to pick a response; the store never
//! retries or recovers locally.

use std::fmt;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of a failed store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Caller input is structurally insufficient, e.g. an empty update.
  BadRequest,
  /// The requested identifier does not exist.
  NotFound,
  /// Everything else: codec, connection, transaction or execution failure.
  InternalServer,
}

impl ErrorKind {
  /// HTTP status a transport layer would typically map this kind to.
  pub fn status_code(self) -> u16 {
    match self {
      Self::BadRequest => 400,
      Self::NotFound => 404,
      Self::InternalServer => 500,
    }
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::BadRequest => "bad request",
      Self::NotFound => "not found",
      Self::InternalServer => "internal server error",
    })
  }
}

/// A classified failure with a human-readable message and, optionally, the
/// underlying cause.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
  kind:    ErrorKind,
  message: String,
  #[source]
  source:  Option<BoxError>,
}

impl ApiError {
  pub fn new(
    kind: ErrorKind,
    message: impl Into<String>,
    source: Option<BoxError>,
  ) -> Self {
    Self { kind, message: message.into(), source }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::BadRequest, message, None)
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::NotFound, message, None)
  }

  pub fn internal(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
    Self::new(ErrorKind::InternalServer, message, Some(source.into()))
  }

  pub fn kind(&self) -> ErrorKind { self.kind }

  pub fn message(&self) -> &str { &self.message }

  pub fn is_not_found(&self) -> bool { self.kind == ErrorKind::NotFound }
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use std::error::Error as _;

  use super::*;

  #[test]
  fn display_includes_kind_and_message() {
    let err = ApiError::not_found("Identity with ID 'idt_x' not found");
    assert_eq!(err.to_string(), "not found: Identity with ID 'idt_x' not found");
    assert!(err.is_not_found());
    assert!(err.source().is_none());
  }

  #[test]
  fn internal_keeps_source() {
    let cause = std::io::Error::other("disk on fire");
    let err = ApiError::internal("Failed to create identity", cause);
    assert_eq!(err.kind(), ErrorKind::InternalServer);
    assert_eq!(err.message(), "Failed to create identity");
    assert_eq!(err.source().unwrap().to_string(), "disk on fire");
  }

  #[test]
  fn status_codes() {
    assert_eq!(ErrorKind::BadRequest.status_code(), 400);
    assert_eq!(ErrorKind::NotFound.status_code(), 404);
    assert_eq!(ErrorKind::InternalServer.status_code(), 500);
  }
}
