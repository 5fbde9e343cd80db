//! Pairwise Jaccard estimation from MinHash signatures.

use crate::config::DEFAULT_HASH_DOMAIN;
use crate::error::{LshError, Result};
use crate::fingerprint::Fingerprint;
use crate::hash_family::HashFamily;
use crate::signature::{SignatureBuilder, SignatureMatrix};
use crate::utils::percentage;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rustc_hash::FxHashSet;

pub const DEFAULT_ESTIMATE_HASH_FUNCTIONS: usize = 100;

/// Estimates Jaccard similarity (as a percentage) between two fingerprint
/// sets.
///
/// Every call to [`SimilarityEstimator::estimate`] draws a fresh
/// [`HashFamily`] from the estimator's generator, so repeated calls vary
/// slightly unless the estimator was seeded.
#[derive(Debug, Clone)]
pub struct SimilarityEstimator {
  num_hash_functions: usize,
  domain_size: u64,
  rng: Xoshiro256PlusPlus,
}

impl Default for SimilarityEstimator {
  fn default() -> Self {
    Self {
      num_hash_functions: DEFAULT_ESTIMATE_HASH_FUNCTIONS,
      domain_size: DEFAULT_HASH_DOMAIN,
      rng: Xoshiro256PlusPlus::seed_from_u64(rand::random()),
    }
  }
}

impl SimilarityEstimator {
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `num_hash_functions` or
  /// `domain_size` is zero.
  pub fn new(num_hash_functions: usize, domain_size: u64) -> Result<Self> {
    Self::with_seed(num_hash_functions, domain_size, rand::random())
  }

  /// Reproducible estimator.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `num_hash_functions` or
  /// `domain_size` is zero.
  pub fn with_seed(
    num_hash_functions: usize,
    domain_size: u64,
    seed: u64,
  ) -> Result<Self> {
    if num_hash_functions == 0 {
      return Err(LshError::invalid(
        "num_hash_functions must be greater than 0",
      ));
    }
    if domain_size == 0 {
      return Err(LshError::invalid("domain_size must be greater than 0"));
    }
    Ok(Self {
      num_hash_functions,
      domain_size,
      rng: Xoshiro256PlusPlus::seed_from_u64(seed),
    })
  }

  #[must_use]
  pub const fn num_hash_functions(&self) -> usize {
    self.num_hash_functions
  }

  /// Estimated similarity of `set_a` and `set_b` in `[0, 100]`.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::DegenerateSignature`] if either set is empty; the
  /// reported row is 0 for `set_a` and 1 for `set_b`.
  pub fn estimate(
    &mut self,
    set_a: &[Fingerprint],
    set_b: &[Fingerprint],
  ) -> Result<f64> {
    let family = HashFamily::generate(
      self.num_hash_functions,
      self.domain_size,
      &mut self.rng,
    )?;
    let matrix = SignatureBuilder::new(family).build(&[set_a, set_b])?;
    estimate_signatures(&matrix, 0, 1)
  }
}

/// Similarity percentage of two rows of an existing signature matrix.
///
/// # Errors
///
/// Returns [`LshError::InvalidInput`] for an out-of-range row and
/// [`LshError::DegenerateSignature`] if either row is degenerate.
pub fn estimate_signatures(
  matrix: &SignatureMatrix,
  left: usize,
  right: usize,
) -> Result<f64> {
  Ok(matrix.agreement(left, right)? * 100.0)
}

/// One-shot estimate with an entropy-seeded family of `num_hash_functions`.
///
/// # Errors
///
/// See [`SimilarityEstimator::estimate`].
pub fn estimate(
  set_a: &[Fingerprint],
  set_b: &[Fingerprint],
  num_hash_functions: usize,
) -> Result<f64> {
  SimilarityEstimator::new(num_hash_functions, DEFAULT_HASH_DOMAIN)?
    .estimate(set_a, set_b)
}

/// Exact Jaccard similarity percentage; two empty sets are 0.
#[must_use]
pub fn exact_jaccard(set_a: &[Fingerprint], set_b: &[Fingerprint]) -> f64 {
  let left: FxHashSet<Fingerprint> = set_a.iter().copied().collect();
  let right: FxHashSet<Fingerprint> = set_b.iter().copied().collect();
  let intersection = left.intersection(&right).count();
  let union = left.len() + right.len() - intersection;
  percentage(intersection, union)
}
