//! Error types shared by every stage of the pipeline.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LshError>;

/// Errors raised by fingerprinting, signature building, banding and extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LshError {
  /// A precondition on the caller's input or configuration was violated.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// A signature row is still at the sentinel because its source set was empty.
  #[error("signature row {row} is degenerate (its fingerprint set was empty)")]
  DegenerateSignature { row: usize },

  /// The digest algorithm cannot supply a 32-bit fingerprint.
  #[error(
    "digest algorithm {algorithm} yields {digest_len} bytes, at least 4 are required"
  )]
  DigestTooShort {
    algorithm: &'static str,
    digest_len: usize,
  },

  /// Encoding or decoding a signature snapshot failed.
  #[error("snapshot error: {0}")]
  Snapshot(String),
}

impl LshError {
  pub(crate) fn invalid(message: impl Into<String>) -> Self {
    Self::InvalidInput(message.into())
  }
}
