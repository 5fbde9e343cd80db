//! Explicit pipeline configuration.
//!
//! Every component takes the parameters it needs from an [`LshConfig`] at
//! construction time. Nothing is inferred from the corpus: band count,
//! signature width and shingle size are always supplied by the caller (or
//! by the defaults below, optionally overridden through the environment).

use crate::error::{LshError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SHINGLE_SIZE: usize = 9;
pub const DEFAULT_NUM_BANDS: usize = 20;
pub const DEFAULT_NUM_HASH_FUNCTIONS: usize = 200;
pub const DEFAULT_BUCKET_SPACE: u64 = 104_729;
/// Smallest prime above `2^32`, so `(a*x + b) mod p` is injective over 32-bit
/// fingerprints whenever `a` is non-zero.
pub const DEFAULT_HASH_DOMAIN: u64 = 4_294_967_311;
pub const DEFAULT_MAX_BUCKET_PAIRS: usize = 1_000_000;

const MAX_SHINGLE_SIZE: usize = 64;
const MAX_NUM_BANDS: usize = 4096;
const MAX_NUM_HASH_FUNCTIONS: usize = 8192;
const MAX_BUCKET_SPACE: u64 = u32::MAX as u64;
// Keeps `a * x + b` within u128 for every u64 input.
const MAX_HASH_DOMAIN: u64 = 1 << 62;

/// Tunable parameters shared by the shingling, signature and LSH stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LshConfig {
  /// k-gram length used when shingling raw text.
  pub shingle_size: usize,
  /// Number of LSH bands the signature is split into.
  pub num_bands: usize,
  /// Signature width (number of hash functions).
  pub num_hash_functions: usize,
  /// Modulus of the band hash.
  pub bucket_space: u64,
  /// Modulus of the linear hash functions.
  pub hash_domain: u64,
  /// Upper bound on the pairs generated from a single bucket.
  pub max_bucket_pairs: usize,
  /// Seed for hash-family generation, `None` for a nondeterministic seed.
  pub seed: Option<u64>,
}

impl Default for LshConfig {
  fn default() -> Self {
    Self {
      shingle_size: DEFAULT_SHINGLE_SIZE,
      num_bands: DEFAULT_NUM_BANDS,
      num_hash_functions: DEFAULT_NUM_HASH_FUNCTIONS,
      bucket_space: DEFAULT_BUCKET_SPACE,
      hash_domain: DEFAULT_HASH_DOMAIN,
      max_bucket_pairs: DEFAULT_MAX_BUCKET_PAIRS,
      seed: None,
    }
  }
}

impl LshConfig {
  /// Defaults with `SHINGLE_LSH_*` environment overrides applied.
  ///
  /// Out-of-range values are clamped; unparsable values are ignored.
  #[must_use]
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      shingle_size: crate::env::read_env_usize_clamped(
        "SHINGLE_LSH_SHINGLE_SIZE",
        defaults.shingle_size,
        1,
        MAX_SHINGLE_SIZE,
      ),
      num_bands: crate::env::read_env_usize_clamped(
        "SHINGLE_LSH_NUM_BANDS",
        defaults.num_bands,
        1,
        MAX_NUM_BANDS,
      ),
      num_hash_functions: crate::env::read_env_usize_clamped(
        "SHINGLE_LSH_NUM_HASH_FUNCTIONS",
        defaults.num_hash_functions,
        1,
        MAX_NUM_HASH_FUNCTIONS,
      ),
      bucket_space: crate::env::read_env_u64_clamped(
        "SHINGLE_LSH_BUCKET_SPACE",
        defaults.bucket_space,
        1,
        MAX_BUCKET_SPACE,
      ),
      hash_domain: crate::env::read_env_u64_clamped(
        "SHINGLE_LSH_HASH_DOMAIN",
        defaults.hash_domain,
        1,
        MAX_HASH_DOMAIN,
      ),
      max_bucket_pairs: crate::env::read_env_usize_clamped(
        "SHINGLE_LSH_MAX_BUCKET_PAIRS",
        defaults.max_bucket_pairs,
        1,
        usize::MAX,
      ),
      seed: crate::env::read_env_u64("SHINGLE_LSH_SEED"),
    }
  }

  #[must_use]
  pub const fn with_shingle_size(mut self, shingle_size: usize) -> Self {
    self.shingle_size = shingle_size;
    self
  }

  #[must_use]
  pub const fn with_num_bands(mut self, num_bands: usize) -> Self {
    self.num_bands = num_bands;
    self
  }

  #[must_use]
  pub const fn with_num_hash_functions(
    mut self,
    num_hash_functions: usize,
  ) -> Self {
    self.num_hash_functions = num_hash_functions;
    self
  }

  #[must_use]
  pub const fn with_bucket_space(mut self, bucket_space: u64) -> Self {
    self.bucket_space = bucket_space;
    self
  }

  #[must_use]
  pub const fn with_hash_domain(mut self, hash_domain: u64) -> Self {
    self.hash_domain = hash_domain;
    self
  }

  #[must_use]
  pub const fn with_max_bucket_pairs(
    mut self,
    max_bucket_pairs: usize,
  ) -> Self {
    self.max_bucket_pairs = max_bucket_pairs;
    self
  }

  #[must_use]
  pub const fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  /// Rows per band, `floor(num_hash_functions / num_bands)`.
  #[must_use]
  pub const fn rows_per_band(&self) -> usize {
    if self.num_bands == 0 {
      0
    } else {
      self.num_hash_functions / self.num_bands
    }
  }

  /// Checks every parameter before any component is built from it.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if any parameter is zero, out of
  /// range, or if there are more bands than hash functions.
  pub fn validate(&self) -> Result<()> {
    if self.shingle_size == 0 {
      return Err(LshError::invalid("shingle_size must be greater than 0"));
    }
    if self.num_hash_functions == 0 {
      return Err(LshError::invalid(
        "num_hash_functions must be greater than 0",
      ));
    }
    if self.num_bands == 0 {
      return Err(LshError::invalid("num_bands must be greater than 0"));
    }
    if self.num_bands > self.num_hash_functions {
      return Err(LshError::invalid(format!(
        "num_bands ({}) must be less than or equal to num_hash_functions ({})",
        self.num_bands, self.num_hash_functions
      )));
    }
    if self.bucket_space == 0 || self.bucket_space > MAX_BUCKET_SPACE {
      return Err(LshError::invalid(format!(
        "bucket_space must be in 1..={MAX_BUCKET_SPACE}, got {}",
        self.bucket_space
      )));
    }
    if self.hash_domain == 0 || self.hash_domain > MAX_HASH_DOMAIN {
      return Err(LshError::invalid(format!(
        "hash_domain must be in 1..={MAX_HASH_DOMAIN}, got {}",
        self.hash_domain
      )));
    }
    if self.max_bucket_pairs == 0 {
      return Err(LshError::invalid("max_bucket_pairs must be greater than 0"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Mutex;

  // `from_env` reads process-wide variables; tests touching them take this.
  static ENV_LOCK: Mutex<()> = Mutex::new(());

  const ENV_KEYS: [&str; 7] = [
    "SHINGLE_LSH_SHINGLE_SIZE",
    "SHINGLE_LSH_NUM_BANDS",
    "SHINGLE_LSH_NUM_HASH_FUNCTIONS",
    "SHINGLE_LSH_BUCKET_SPACE",
    "SHINGLE_LSH_HASH_DOMAIN",
    "SHINGLE_LSH_MAX_BUCKET_PAIRS",
    "SHINGLE_LSH_SEED",
  ];

  fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
      .lock()
      .unwrap_or_else(std::sync::PoisonError::into_inner);
    for key in ENV_KEYS {
      std::env::remove_var(key);
    }
    for (key, value) in vars {
      std::env::set_var(key, value);
    }
    let result = f();
    for key in ENV_KEYS {
      std::env::remove_var(key);
    }
    result
  }

  #[test]
  fn from_env_without_overrides_is_default() {
    assert_eq!(with_env(&[], LshConfig::from_env), LshConfig::default());
  }

  #[test]
  fn from_env_applies_and_clamps_overrides() {
    let config = with_env(
      &[
        ("SHINGLE_LSH_NUM_BANDS", "99999"),
        ("SHINGLE_LSH_SHINGLE_SIZE", "0"),
        ("SHINGLE_LSH_NUM_HASH_FUNCTIONS", " 512 "),
        ("SHINGLE_LSH_BUCKET_SPACE", "18446744073709551615"),
        ("SHINGLE_LSH_SEED", "42"),
      ],
      LshConfig::from_env,
    );
    assert_eq!(config.num_bands, 4096);
    assert_eq!(config.shingle_size, 1);
    assert_eq!(config.num_hash_functions, 512);
    assert_eq!(config.bucket_space, u64::from(u32::MAX));
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.hash_domain, DEFAULT_HASH_DOMAIN);
  }

  #[test]
  fn from_env_ignores_unparsable_values() {
    let config = with_env(
      &[
        ("SHINGLE_LSH_NUM_BANDS", "lots"),
        ("SHINGLE_LSH_HASH_DOMAIN", "-5"),
        ("SHINGLE_LSH_MAX_BUCKET_PAIRS", "1e6"),
        ("SHINGLE_LSH_SEED", "seed"),
      ],
      LshConfig::from_env,
    );
    assert_eq!(config, LshConfig::default());
  }

  #[test]
  fn defaults_are_valid() {
    let config = LshConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.rows_per_band(), 10);
  }

  #[test]
  fn rejects_more_bands_than_hash_functions() {
    let config = LshConfig::default()
      .with_num_hash_functions(10)
      .with_num_bands(11);
    assert!(matches!(config.validate(), Err(LshError::InvalidInput(_))));
    assert_eq!(config.rows_per_band(), 0);
  }

  #[test]
  fn rejects_zero_parameters() {
    let zeroed = [
      LshConfig::default().with_shingle_size(0),
      LshConfig::default().with_num_bands(0),
      LshConfig::default().with_num_hash_functions(0),
      LshConfig::default().with_bucket_space(0),
      LshConfig::default().with_hash_domain(0),
      LshConfig::default().with_max_bucket_pairs(0),
    ];
    for config in zeroed {
      assert!(
        matches!(config.validate(), Err(LshError::InvalidInput(_))),
        "{config:?} should be rejected"
      );
    }
  }

  #[test]
  fn serde_round_trip_preserves_seed() {
    let config = LshConfig::default().with_seed(7).with_num_bands(25);
    let bytes =
      bincode::serde::encode_to_vec(&config, bincode::config::standard())
        .unwrap();
    let (decoded, _): (LshConfig, usize) =
      bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
        .unwrap();
    assert_eq!(decoded, config);
  }
}
