//! MinHash signature matrix construction.
//!
//! Given `N` fingerprint sets and a [`HashFamily`] of `K` functions, the
//! builder produces an `N x K` [`SignatureMatrix`] where cell `(i, h)` is the
//! minimum of `h(f)` over every fingerprint `f` of set `i`.
//!
//! The universe (the union of all sets) is deduplicated into a map from
//! fingerprint to the sets that own it. Every distinct fingerprint is hashed
//! once and then folded into each owning row, so construction is linear in
//! the total number of fingerprints instead of rescanning every set for
//! every universe element.

use crate::error::{LshError, Result};
use crate::fingerprint::Fingerprint;
use crate::hash_family::HashFamily;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

mod matrix;

pub use matrix::{SignatureMatrix, SENTINEL};

/// Builds [`SignatureMatrix`]es with one fixed [`HashFamily`].
#[derive(Debug, Clone)]
pub struct SignatureBuilder {
  family: HashFamily,
}

impl SignatureBuilder {
  #[must_use]
  pub const fn new(family: HashFamily) -> Self {
    Self { family }
  }

  #[must_use]
  pub const fn family(&self) -> &HashFamily {
    &self.family
  }

  #[must_use]
  pub fn width(&self) -> usize {
    self.family.len()
  }

  fn validate_inputs(&self, set_count: usize) -> Result<()> {
    if set_count == 0 {
      return Err(LshError::invalid(
        "at least one fingerprint set is required",
      ));
    }
    if self.family.is_empty() {
      return Err(LshError::invalid(
        "the hash family has no hash functions",
      ));
    }
    if self.family.domain_size() == 0 {
      return Err(LshError::invalid("the hash family has an empty domain"));
    }
    Ok(())
  }

  /// Maps each distinct fingerprint to the ascending, duplicate-free list of
  /// set indices containing it.
  fn owners_by_fingerprint<S>(sets: &[S]) -> FxHashMap<Fingerprint, Vec<usize>>
  where
    S: AsRef<[Fingerprint]>,
  {
    let total: usize = sets.iter().map(|set| set.as_ref().len()).sum();
    let mut owners: FxHashMap<Fingerprint, Vec<usize>> =
      FxHashMap::with_capacity_and_hasher(total, Default::default());

    for (set_index, set) in sets.iter().enumerate() {
      for &fingerprint in set.as_ref() {
        let entry = owners.entry(fingerprint).or_default();
        // Sets are visited in index order, so a repeat of this set can only
        // sit at the tail.
        if entry.last() != Some(&set_index) {
          entry.push(set_index);
        }
      }
    }
    owners
  }

  /// Builds the signature matrix for `sets`.
  ///
  /// Empty sets are legal; their rows stay at [`SENTINEL`] and are reported
  /// as degenerate by the matrix.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `sets` is empty or the family has
  /// no hash functions.
  #[instrument(skip_all, fields(sets = sets.len(), width = self.family.len()))]
  pub fn build<S>(&self, sets: &[S]) -> Result<SignatureMatrix>
  where
    S: AsRef<[Fingerprint]>,
  {
    self.validate_inputs(sets.len())?;

    let width = self.family.len();
    let owners = Self::owners_by_fingerprint(sets);
    let mut data = vec![SENTINEL; sets.len() * width];
    let mut hash_values = vec![0_u64; width];

    for (&fingerprint, owning_sets) in &owners {
      self.family.apply_all(u64::from(fingerprint), &mut hash_values);
      for &set_index in owning_sets {
        let row = &mut data[set_index * width..(set_index + 1) * width];
        for (cell, &value) in row.iter_mut().zip(&hash_values) {
          *cell = (*cell).min(value);
        }
      }
    }

    let matrix = SignatureMatrix::from_parts(
      sets.len(),
      width,
      self.family.domain_size(),
      data,
    );
    debug!(
      universe = owners.len(),
      degenerate_rows = matrix.degenerate_rows().len(),
      "built signature matrix"
    );
    Ok(matrix)
  }
}

/// Free-function form of [`SignatureBuilder::build`].
///
/// # Errors
///
/// See [`SignatureBuilder::build`].
pub fn build_signatures<S>(
  sets: &[S],
  family: &HashFamily,
) -> Result<SignatureMatrix>
where
  S: AsRef<[Fingerprint]>,
{
  SignatureBuilder::new(family.clone()).build(sets)
}
