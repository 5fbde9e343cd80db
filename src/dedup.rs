//! End-to-end near-duplicate search over an in-memory corpus.

use crate::candidates::{CandidateExtractor, CandidatePair, CandidatePairs};
use crate::config::LshConfig;
use crate::error::{LshError, Result};
use crate::fingerprint::{FingerprintEncoder, FingerprintSet};
use crate::hash_family::HashFamily;
use crate::lsh::LshBander;
use crate::signature::{SignatureBuilder, SignatureMatrix};
use crate::similarity::estimate_signatures;
use crate::text::char_shingles;
use tracing::instrument;

/// A candidate pair with its estimated similarity percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
  pub pair: CandidatePair,
  pub similarity: f64,
}

/// Text → shingles → fingerprints → signatures → bands → candidate pairs.
///
/// The hash family is generated once at construction, so every call on the
/// same finder simulates the same permutations.
#[derive(Debug, Clone)]
pub struct NearDuplicateFinder {
  config: LshConfig,
  encoder: FingerprintEncoder,
  builder: SignatureBuilder,
  bander: LshBander,
  extractor: CandidateExtractor,
}

impl NearDuplicateFinder {
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if the configuration is invalid.
  pub fn new(config: LshConfig) -> Result<Self> {
    config.validate()?;
    let family = HashFamily::from_optional_seed(
      config.num_hash_functions,
      config.hash_domain,
      config.seed,
    )?;
    Ok(Self {
      encoder: FingerprintEncoder::default(),
      builder: SignatureBuilder::new(family),
      bander: LshBander::from_config(&config)?,
      extractor: CandidateExtractor::from_config(&config)?,
      config,
    })
  }

  #[must_use]
  pub const fn config(&self) -> &LshConfig {
    &self.config
  }

  #[must_use]
  pub const fn family(&self) -> &HashFamily {
    self.builder.family()
  }

  /// Character shingles of each document, fingerprinted.
  ///
  /// Documents shorter than the shingle size produce empty sets.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if the shingle size is zero.
  pub fn fingerprint_documents<S: AsRef<str>>(
    &self,
    documents: &[S],
  ) -> Result<Vec<FingerprintSet>> {
    documents
      .iter()
      .map(|document| {
        let shingles =
          char_shingles(document.as_ref(), self.config.shingle_size)?;
        Ok(self.encoder.encode_all(shingles))
      })
      .collect()
  }

  /// # Errors
  ///
  /// See [`SignatureBuilder::build`].
  pub fn signatures(&self, sets: &[FingerprintSet]) -> Result<SignatureMatrix> {
    self.builder.build(sets)
  }

  /// Candidate near-duplicate pairs among `documents` (indices into the
  /// slice).
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `documents` is empty or the
  /// signature is narrower than the configured band count.
  #[instrument(skip_all, fields(documents = documents.len()))]
  pub fn find<S: AsRef<str>>(&self, documents: &[S]) -> Result<CandidatePairs> {
    let sets = self.fingerprint_documents(documents)?;
    let matrix = self.signatures(&sets)?;
    self.candidates(&matrix)
  }

  /// Candidate pairs for an already built signature matrix.
  ///
  /// # Errors
  ///
  /// See [`LshBander::band`].
  pub fn candidates(&self, matrix: &SignatureMatrix) -> Result<CandidatePairs> {
    let buckets = self.bander.band(matrix)?;
    Ok(self.extractor.extract(&buckets))
  }

  /// Candidates re-scored by signature agreement, keeping those at or above
  /// `threshold_percent`, in descending similarity order.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if the threshold is not a finite
  /// value in `[0, 100]`, plus anything [`NearDuplicateFinder::find`]
  /// returns.
  #[instrument(
    skip_all,
    fields(documents = documents.len(), threshold_percent = threshold_percent)
  )]
  pub fn find_verified<S: AsRef<str>>(
    &self,
    documents: &[S],
    threshold_percent: f64,
  ) -> Result<Vec<ScoredPair>> {
    if !threshold_percent.is_finite()
      || !(0.0..=100.0).contains(&threshold_percent)
    {
      return Err(LshError::invalid(
        "threshold_percent must be a finite value between 0 and 100",
      ));
    }

    let sets = self.fingerprint_documents(documents)?;
    let matrix = self.signatures(&sets)?;
    let candidates = self.candidates(&matrix)?;

    let mut scored = Vec::with_capacity(candidates.len());
    for &pair in &candidates {
      let similarity =
        estimate_signatures(&matrix, pair.first(), pair.second())?;
      if similarity >= threshold_percent {
        scored.push(ScoredPair { pair, similarity });
      }
    }
    scored.sort_by(|a, b| {
      b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.pair.cmp(&b.pair))
    });
    Ok(scored)
  }
}
