//! Prefixed identifier generation.

use uuid::Uuid;

/// Entity-type tag embedded in every identity identifier.
pub const IDENTITY_ID_PREFIX: &str = "idt";

/// `"{prefix}_{uuid v4}"`. Uniqueness rests on the UUID; the store does not
/// check for collisions.
pub fn generate_id(prefix: &str) -> String {
  format!("{prefix}_{}", Uuid::new_v4().hyphenated())
}

pub fn generate_identity_id() -> String { generate_id(IDENTITY_ID_PREFIX) }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identity_ids_are_prefixed_and_distinct() {
    let a = generate_identity_id();
    let b = generate_identity_id();
    assert!(a.starts_with("idt_"), "{a}");
    assert_ne!(a, b);
    assert!(Uuid::parse_str(&a["idt_".len()..]).is_ok());
  }
}
