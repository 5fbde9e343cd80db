//! Locality-Sensitive Hashing over a [`SignatureMatrix`].
//!
//! The signature columns are split into `num_bands` contiguous,
//! non-overlapping bands of `r = floor(width / num_bands)` columns each.
//! Band `b` covers columns `b * r .. b * r + r`; when `r * num_bands` is
//! smaller than the width, the trailing columns are simply not used.
//!
//! For every band, each item's slice is hashed to a bucket id in
//! `[0, bucket_space)`. Items sharing a bucket in any band are candidate
//! near-duplicates (see [`crate::candidates`]).
//!
//! Rows of empty sets (still at the sentinel) would collide with each other in
//! every band, so they are left out of the buckets and listed in
//! [`BandedBuckets::degenerate_items`] instead.

use crate::config::LshConfig;
use crate::error::{LshError, Result};
use crate::signature::SignatureMatrix;
use rustc_hash::FxHashMap;
use std::ops::Range;
use tracing::{debug, instrument, warn};

mod bucket_hash;
#[cfg(test)]
mod tests;

pub use bucket_hash::band_bucket_id;

/// Buckets of one band: bucket id → ascending item indices.
pub type BandTable = FxHashMap<u64, Vec<usize>>;

const MAX_BUCKET_SPACE: u64 = u32::MAX as u64;

/// Column ranges of each band: `start = b * r`, `end = start + r`.
///
/// # Errors
///
/// Returns [`LshError::InvalidInput`] if `num_bands` is zero or larger than
/// `width` (which would make `r == 0`).
pub fn band_ranges(
  width: usize,
  num_bands: usize,
) -> Result<Vec<Range<usize>>> {
  let rows_per_band = rows_per_band(width, num_bands)?;
  Ok(
    (0..num_bands)
      .map(|band| {
        let start = band * rows_per_band;
        start..start + rows_per_band
      })
      .collect(),
  )
}

fn rows_per_band(width: usize, num_bands: usize) -> Result<usize> {
  if num_bands == 0 {
    return Err(LshError::invalid("num_bands must be greater than 0"));
  }
  let rows_per_band = width / num_bands;
  if rows_per_band == 0 {
    return Err(LshError::invalid(format!(
      "num_bands ({num_bands}) exceeds the signature width ({width})"
    )));
  }
  Ok(rows_per_band)
}

/// Per-band bucket tables produced by [`LshBander::band`].
#[derive(Debug, Clone)]
pub struct BandedBuckets {
  rows_per_band: usize,
  bucket_space: u64,
  tables: Vec<BandTable>,
  // assignments[band][item], `None` for degenerate items.
  assignments: Vec<Vec<Option<u64>>>,
  degenerate_items: Vec<usize>,
}

impl BandedBuckets {
  #[must_use]
  pub fn num_bands(&self) -> usize {
    self.tables.len()
  }

  #[must_use]
  pub const fn rows_per_band(&self) -> usize {
    self.rows_per_band
  }

  #[must_use]
  pub const fn bucket_space(&self) -> u64 {
    self.bucket_space
  }

  #[must_use]
  pub fn band(&self, band_index: usize) -> Option<&BandTable> {
    self.tables.get(band_index)
  }

  /// Items hashed to `bucket_id` in band `band_index`, ascending.
  #[must_use]
  pub fn bucket(&self, band_index: usize, bucket_id: u64) -> Option<&[usize]> {
    self
      .tables
      .get(band_index)?
      .get(&bucket_id)
      .map(Vec::as_slice)
  }

  /// Bucket id of `item` in band `band_index`; `None` for degenerate or
  /// unknown items.
  #[must_use]
  pub fn bucket_of(&self, band_index: usize, item: usize) -> Option<u64> {
    self.assignments.get(band_index)?.get(item).copied().flatten()
  }

  /// Band tables in band order.
  pub fn iter(&self) -> impl Iterator<Item = (usize, &BandTable)> {
    self.tables.iter().enumerate()
  }

  /// Items whose signature rows were degenerate and therefore left unbucketed.
  #[must_use]
  pub fn degenerate_items(&self) -> &[usize] {
    &self.degenerate_items
  }
}

/// Splits signatures into bands and hashes every band slice to a bucket.
#[derive(Debug, Clone, Copy)]
pub struct LshBander {
  num_bands: usize,
  bucket_space: u64,
}

impl LshBander {
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `num_bands` is zero or
  /// `bucket_space` is outside `1..=u32::MAX`.
  pub fn new(num_bands: usize, bucket_space: u64) -> Result<Self> {
    if num_bands == 0 {
      return Err(LshError::invalid("num_bands must be greater than 0"));
    }
    if bucket_space == 0 || bucket_space > MAX_BUCKET_SPACE {
      return Err(LshError::invalid(format!(
        "bucket_space must be in 1..={MAX_BUCKET_SPACE}, got {bucket_space}"
      )));
    }
    Ok(Self {
      num_bands,
      bucket_space,
    })
  }

  /// # Errors
  ///
  /// See [`LshBander::new`].
  pub fn from_config(config: &LshConfig) -> Result<Self> {
    Self::new(config.num_bands, config.bucket_space)
  }

  #[must_use]
  pub const fn num_bands(&self) -> usize {
    self.num_bands
  }

  #[must_use]
  pub const fn bucket_space(&self) -> u64 {
    self.bucket_space
  }

  /// Buckets every non-degenerate row of `sig` in every band.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if the signature is narrower than the
  /// number of bands.
  #[instrument(
    skip_all,
    fields(rows = sig.rows(), width = sig.width(), bands = self.num_bands)
  )]
  pub fn band(&self, sig: &SignatureMatrix) -> Result<BandedBuckets> {
    let ranges = band_ranges(sig.width(), self.num_bands)?;
    let rows_per_band =
      ranges.first().map_or(0, |range| range.end - range.start);

    let degenerate_items = sig.degenerate_rows();
    if !degenerate_items.is_empty() {
      warn!(
        count = degenerate_items.len(),
        "excluding degenerate signature rows from LSH buckets"
      );
    }

    let mut tables = Vec::with_capacity(self.num_bands);
    let mut assignments = Vec::with_capacity(self.num_bands);
    for range in ranges {
      let mut table = BandTable::default();
      let mut band_assignments = Vec::with_capacity(sig.rows());
      for item in 0..sig.rows() {
        if sig.is_degenerate(item) {
          band_assignments.push(None);
          continue;
        }
        let bucket_id =
          band_bucket_id(&sig.row(item)[range.clone()], self.bucket_space);
        table.entry(bucket_id).or_default().push(item);
        band_assignments.push(Some(bucket_id));
      }
      tables.push(table);
      assignments.push(band_assignments);
    }

    debug!(
      rows_per_band,
      unused_columns = sig.width() - rows_per_band * self.num_bands,
      buckets = tables.iter().map(BandTable::len).sum::<usize>(),
      "banded signature matrix"
    );

    Ok(BandedBuckets {
      rows_per_band,
      bucket_space: self.bucket_space,
      tables,
      assignments,
      degenerate_items,
    })
  }
}
