//! Near-duplicate detection with shingling, `MinHash` and LSH banding.
//!
//! The pipeline runs leaves first:
//!
//! 1. [`text`] turns raw text into shingle strings.
//! 2. [`FingerprintEncoder`] maps each shingle to a 32-bit fingerprint.
//! 3. [`HashFamily`] holds `K` fixed linear hash functions that simulate
//!    random permutations of the fingerprint universe.
//! 4. [`SignatureBuilder`] folds every set into one row of an `N x K`
//!    [`SignatureMatrix`] of per-function minima.
//! 5. [`LshBander`] splits the columns into bands and hashes each band slice
//!    into a bucket.
//! 6. [`CandidateExtractor`] reports every pair of items sharing a bucket in
//!    at least one band, exactly once.
//!
//! [`SimilarityEstimator`] compares two sets directly without banding, and
//! [`NearDuplicateFinder`] wires the whole pipeline together from an
//! [`LshConfig`].
//!
//! Everything is in-memory and single-threaded; each call owns its inputs and
//! outputs and keeps no state between calls.
//!
//! ## Example
//!
//! ```
//! use shingle_lsh::{LshConfig, NearDuplicateFinder};
//!
//! let finder = NearDuplicateFinder::new(
//!   LshConfig::default().with_shingle_size(3).with_seed(7),
//! )?;
//! let docs = [
//!   "the cat sat on the mat",
//!   "the cat sat on the mat",
//!   "banana bread",
//! ];
//! let candidates = finder.find(&docs)?;
//! assert!(candidates.contains(0, 1));
//! # Ok::<(), shingle_lsh::LshError>(())
//! ```

pub mod candidates;
pub mod combinations;
pub mod config;
pub mod dedup;
mod env;
pub mod error;
pub mod fingerprint;
pub mod hash_family;
pub mod lsh;
pub mod signature;
pub mod similarity;
pub mod text;
mod utils;

pub use candidates::{
  extract_candidates, CandidateExtractor, CandidatePair, CandidatePairs,
  OversizedBucket,
};
pub use config::LshConfig;
pub use dedup::{NearDuplicateFinder, ScoredPair};
pub use error::{LshError, Result};
pub use fingerprint::{
  DigestAlgorithm, Fingerprint, FingerprintEncoder, FingerprintSet, FxDigest,
  Murmur3Digest,
};
pub use hash_family::{HashFamily, HashFunction};
pub use lsh::{band_ranges, BandedBuckets, LshBander};
pub use signature::{
  build_signatures, SignatureBuilder, SignatureMatrix, SENTINEL,
};
pub use similarity::{
  estimate, estimate_signatures, exact_jaccard, SimilarityEstimator,
};
