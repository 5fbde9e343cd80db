//! Shingle → 32-bit fingerprint conversion.
//!
//! A [`FingerprintEncoder`] wraps any [`DigestAlgorithm`] and keeps the
//! leading four digest bytes (big-endian) as the fingerprint. Digests that
//! cannot supply four bytes are rejected when the encoder is built, so
//! [`FingerprintEncoder::encode`] itself never fails.

use crate::error::{LshError, Result};
use rustc_hash::FxHasher;
use std::hash::Hasher;
use std::io::Cursor;

/// Fixed-width identifier of one shingle.
pub type Fingerprint = u32;

/// One document's fingerprints, in shingle order. Duplicates are allowed and
/// are treated as a single set member.
pub type FingerprintSet = Vec<Fingerprint>;

const FINGERPRINT_BYTES: usize = 4;
const MURMUR3_SEED: u32 = 0;

/// A stable byte-string digest: equal input bytes always yield equal digests.
pub trait DigestAlgorithm {
  /// Human-readable algorithm name used in error messages.
  fn name(&self) -> &'static str;

  /// Number of bytes every call to [`DigestAlgorithm::digest`] returns.
  fn digest_len(&self) -> usize;

  fn digest(&self, bytes: &[u8]) -> Vec<u8>;
}

/// 128-bit x64 Murmur3.
#[derive(Debug, Clone, Copy, Default)]
pub struct Murmur3Digest;

impl DigestAlgorithm for Murmur3Digest {
  fn name(&self) -> &'static str {
    "murmur3_x64_128"
  }

  fn digest_len(&self) -> usize {
    16
  }

  fn digest(&self, bytes: &[u8]) -> Vec<u8> {
    // Reading from an in-memory cursor cannot fail.
    murmur3::murmur3_x64_128(&mut Cursor::new(bytes), MURMUR3_SEED)
      .unwrap_or_default()
      .to_be_bytes()
      .to_vec()
  }
}

/// 64-bit Fx hash, the same hasher the crate uses for its hash maps.
#[derive(Debug, Clone, Copy, Default)]
pub struct FxDigest;

impl DigestAlgorithm for FxDigest {
  fn name(&self) -> &'static str {
    "fxhash64"
  }

  fn digest_len(&self) -> usize {
    8
  }

  fn digest(&self, bytes: &[u8]) -> Vec<u8> {
    let mut hasher = FxHasher::default();
    hasher.write(bytes);
    hasher.finish().to_be_bytes().to_vec()
  }
}

/// Maps shingle strings to [`Fingerprint`]s.
#[derive(Debug, Clone)]
pub struct FingerprintEncoder<D = Murmur3Digest> {
  algorithm: D,
}

impl Default for FingerprintEncoder<Murmur3Digest> {
  fn default() -> Self {
    Self {
      algorithm: Murmur3Digest,
    }
  }
}

impl<D: DigestAlgorithm> FingerprintEncoder<D> {
  /// Wraps `algorithm` after checking it yields at least 32 bits.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::DigestTooShort`] if the digest has fewer than four
  /// bytes.
  pub fn new(algorithm: D) -> Result<Self> {
    let digest_len = algorithm.digest_len();
    if digest_len < FINGERPRINT_BYTES {
      return Err(LshError::DigestTooShort {
        algorithm: algorithm.name(),
        digest_len,
      });
    }
    Ok(Self { algorithm })
  }

  #[must_use]
  pub fn encode(&self, shingle: &str) -> Fingerprint {
    let digest = self.algorithm.digest(shingle.as_bytes());
    let mut leading = [0_u8; FINGERPRINT_BYTES];
    for (slot, byte) in leading.iter_mut().zip(digest.iter()) {
      *slot = *byte;
    }
    Fingerprint::from_be_bytes(leading)
  }

  /// Encodes every shingle, keeping the input order.
  pub fn encode_all<I, S>(&self, shingles: I) -> FingerprintSet
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    shingles
      .into_iter()
      .map(|shingle| self.encode(shingle.as_ref()))
      .collect()
  }

  pub const fn algorithm(&self) -> &D {
    &self.algorithm
  }
}
