//! ETag computation for exported roster documents.
//!
//! The tag is a SHA-256 hash over the exact bytes served, so two exports
//! compare equal iff their bodies do.

use sha2::{Digest, Sha256};

/// Compute a quoted strong ETag for `body`.
pub fn compute_etag(body: &[u8]) -> String {
  let hash = Sha256::digest(body);
  format!("\"{}\"", hex::encode(hash))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn etag_is_quoted_hex_sha256() {
    let tag = compute_etag(b"");
    assert_eq!(
      tag,
      "\"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\""
    );
  }

  #[test]
  fn different_bodies_differ() {
    assert_ne!(compute_etag(b"{\"a\":1}"), compute_etag(b"{\"a\":2}"));
    assert_eq!(compute_etag(b"same"), compute_etag(b"same"));
  }
}
