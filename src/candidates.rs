//! Candidate-pair extraction from LSH bucket collisions.

use crate::combinations::{pair_count, pairs};
use crate::config::{LshConfig, DEFAULT_MAX_BUCKET_PAIRS};
use crate::error::{LshError, Result};
use crate::lsh::BandedBuckets;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Unordered pair of distinct item indices, stored with `first < second`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct CandidatePair {
  first: usize,
  second: usize,
}

impl TryFrom<(usize, usize)> for CandidatePair {
  type Error = LshError;

  fn try_from((a, b): (usize, usize)) -> Result<Self> {
    Self::new(a, b).ok_or_else(|| {
      LshError::invalid(format!("candidate pair ({a}, {b}) repeats an item"))
    })
  }
}

impl From<CandidatePair> for (usize, usize) {
  fn from(pair: CandidatePair) -> Self {
    pair.as_tuple()
  }
}

impl CandidatePair {
  /// Normalised pair, or `None` when `a == b`.
  #[must_use]
  pub const fn new(a: usize, b: usize) -> Option<Self> {
    if a == b {
      None
    } else if a < b {
      Some(Self { first: a, second: b })
    } else {
      Some(Self { first: b, second: a })
    }
  }

  #[must_use]
  pub const fn first(&self) -> usize {
    self.first
  }

  #[must_use]
  pub const fn second(&self) -> usize {
    self.second
  }

  #[must_use]
  pub const fn as_tuple(&self) -> (usize, usize) {
    (self.first, self.second)
  }
}

/// A bucket skipped because it would have produced too many pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OversizedBucket {
  pub band: usize,
  pub bucket_id: u64,
  pub size: usize,
}

/// Deduplicated candidate pairs, in ascending order.
#[derive(Debug, Clone, Default)]
pub struct CandidatePairs {
  pairs: Vec<CandidatePair>,
  degenerate_items: Vec<usize>,
  oversized_buckets: Vec<OversizedBucket>,
}

impl CandidatePairs {
  #[must_use]
  pub fn len(&self) -> usize {
    self.pairs.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.pairs.is_empty()
  }

  /// Order-insensitive membership test.
  #[must_use]
  pub fn contains(&self, a: usize, b: usize) -> bool {
    CandidatePair::new(a, b)
      .is_some_and(|pair| self.pairs.binary_search(&pair).is_ok())
  }

  pub fn iter(&self) -> std::slice::Iter<'_, CandidatePair> {
    self.pairs.iter()
  }

  #[must_use]
  pub fn as_slice(&self) -> &[CandidatePair] {
    &self.pairs
  }

  #[must_use]
  pub fn to_tuples(&self) -> Vec<(usize, usize)> {
    self.pairs.iter().map(CandidatePair::as_tuple).collect()
  }

  /// Items left out of banding because their sets were empty. No pair
  /// involving them is ever reported.
  #[must_use]
  pub fn degenerate_items(&self) -> &[usize] {
    &self.degenerate_items
  }

  #[must_use]
  pub fn oversized_buckets(&self) -> &[OversizedBucket] {
    &self.oversized_buckets
  }
}

impl<'a> IntoIterator for &'a CandidatePairs {
  type Item = &'a CandidatePair;
  type IntoIter = std::slice::Iter<'a, CandidatePair>;

  fn into_iter(self) -> Self::IntoIter {
    self.pairs.iter()
  }
}

/// Turns bucket collisions into a deduplicated set of [`CandidatePair`]s.
#[derive(Debug, Clone, Copy)]
pub struct CandidateExtractor {
  max_bucket_pairs: usize,
}

impl Default for CandidateExtractor {
  fn default() -> Self {
    Self {
      max_bucket_pairs: DEFAULT_MAX_BUCKET_PAIRS,
    }
  }
}

impl CandidateExtractor {
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `max_bucket_pairs` is zero.
  pub fn new(max_bucket_pairs: usize) -> Result<Self> {
    if max_bucket_pairs == 0 {
      return Err(LshError::invalid("max_bucket_pairs must be greater than 0"));
    }
    Ok(Self { max_bucket_pairs })
  }

  /// # Errors
  ///
  /// See [`CandidateExtractor::new`].
  pub fn from_config(config: &LshConfig) -> Result<Self> {
    Self::new(config.max_bucket_pairs)
  }

  #[must_use]
  pub const fn max_bucket_pairs(&self) -> usize {
    self.max_bucket_pairs
  }

  /// Every unordered pair of items that shares a bucket in at least one band,
  /// each reported once.
  ///
  /// Buckets whose pair count exceeds `max_bucket_pairs` are skipped and
  /// listed in [`CandidatePairs::oversized_buckets`].
  #[instrument(skip_all, fields(bands = buckets.num_bands()))]
  pub fn extract(&self, buckets: &BandedBuckets) -> CandidatePairs {
    let mut seen: FxHashSet<CandidatePair> = FxHashSet::default();
    let mut oversized_buckets = Vec::new();

    for (band, table) in buckets.iter() {
      for (&bucket_id, items) in table {
        if items.len() < 2 {
          continue;
        }
        let bucket_pairs = pair_count(items.len());
        if bucket_pairs > self.max_bucket_pairs {
          warn!(
            band,
            bucket_id,
            size = items.len(),
            pairs = bucket_pairs,
            limit = self.max_bucket_pairs,
            "skipping oversized LSH bucket"
          );
          oversized_buckets.push(OversizedBucket {
            band,
            bucket_id,
            size: items.len(),
          });
          continue;
        }
        seen.extend(pairs(items).filter_map(|(a, b)| CandidatePair::new(a, b)));
      }
    }

    let mut pairs: Vec<CandidatePair> = seen.into_iter().collect();
    pairs.sort_unstable();
    oversized_buckets
      .sort_unstable_by_key(|bucket| (bucket.band, bucket.bucket_id));
    debug!(
      pairs = pairs.len(),
      oversized = oversized_buckets.len(),
      "extracted candidate pairs"
    );

    CandidatePairs {
      pairs,
      degenerate_items: buckets.degenerate_items().to_vec(),
      oversized_buckets,
    }
  }
}

/// Extracts candidates with the default pair limit.
#[must_use]
pub fn extract_candidates(buckets: &BandedBuckets) -> CandidatePairs {
  CandidateExtractor::default().extract(buckets)
}
