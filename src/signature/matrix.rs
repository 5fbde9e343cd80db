use crate::error::{LshError, Result};
use crate::utils::ratio_usize;
use serde::{Deserialize, Serialize};

/// Initial value of every cell; larger than any attainable hash value.
pub const SENTINEL: u64 = u64::MAX;

/// Row-major `rows x width` MinHash signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureMatrix {
  rows: usize,
  width: usize,
  domain_size: u64,
  data: Vec<u64>,
}

impl SignatureMatrix {
  pub(crate) fn from_parts(
    rows: usize,
    width: usize,
    domain_size: u64,
    data: Vec<u64>,
  ) -> Self {
    debug_assert_eq!(data.len(), rows * width);
    Self {
      rows,
      width,
      domain_size,
      data,
    }
  }

  /// Builds a matrix from explicit rows, mostly useful for feeding the LSH
  /// stage with signatures computed elsewhere.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if there are no rows, the rows have
  /// different or zero widths, or a non-sentinel cell is outside
  /// `[0, domain_size)`.
  pub fn from_rows(rows: &[Vec<u64>], domain_size: u64) -> Result<Self> {
    let width = rows.first().map_or(0, Vec::len);
    if let Some((index, row)) =
      rows.iter().enumerate().find(|(_, row)| row.len() != width)
    {
      return Err(LshError::invalid(format!(
        "row {index} has {} columns, expected {width}",
        row.len()
      )));
    }
    let matrix = Self {
      rows: rows.len(),
      width,
      domain_size,
      data: rows.concat(),
    };
    matrix.validate_state()?;
    Ok(matrix)
  }

  pub(crate) fn validate_state(&self) -> Result<()> {
    if self.rows == 0 {
      return Err(LshError::invalid("signature matrix has no rows"));
    }
    if self.width == 0 {
      return Err(LshError::invalid("signature matrix has no columns"));
    }
    if self.domain_size == 0 {
      return Err(LshError::invalid("domain_size must be greater than 0"));
    }
    let Some(cells) = self.rows.checked_mul(self.width) else {
      return Err(LshError::invalid(format!(
        "invalid signature matrix state: {} rows of width {} overflow",
        self.rows, self.width
      )));
    };
    if self.data.len() != cells {
      return Err(LshError::invalid(format!(
        "invalid signature matrix state: {} cells for {} rows of width {}",
        self.data.len(),
        self.rows,
        self.width
      )));
    }
    if let Some(cell) = self
      .data
      .iter()
      .find(|&&cell| cell != SENTINEL && cell >= self.domain_size)
    {
      return Err(LshError::invalid(format!(
        "invalid signature matrix state: cell value {cell} is outside domain {}",
        self.domain_size
      )));
    }
    for row in 0..self.rows {
      let cells = self.row(row);
      let sentinels = cells.iter().filter(|&&cell| cell == SENTINEL).count();
      if sentinels != 0 && sentinels != cells.len() {
        return Err(LshError::invalid(format!(
          "invalid signature matrix state: row {row} is partially sentinel"
        )));
      }
    }
    Ok(())
  }

  #[inline]
  #[must_use]
  pub const fn rows(&self) -> usize {
    self.rows
  }

  /// Number of hash functions (columns).
  #[inline]
  #[must_use]
  pub const fn width(&self) -> usize {
    self.width
  }

  #[inline]
  #[must_use]
  pub const fn domain_size(&self) -> u64 {
    self.domain_size
  }

  /// Signature of set `row_index`.
  ///
  /// # Panics
  ///
  /// Panics if `row_index >= rows()`.
  #[inline]
  #[must_use]
  pub fn row(&self, row_index: usize) -> &[u64] {
    let start = row_index * self.width;
    &self.data[start..start + self.width]
  }

  #[must_use]
  pub fn get(&self, row_index: usize, column: usize) -> Option<u64> {
    if row_index >= self.rows || column >= self.width {
      return None;
    }
    self.data.get(row_index * self.width + column).copied()
  }

  /// `true` if the row was never lowered from the sentinel, i.e. its set was
  /// empty.
  #[must_use]
  pub fn is_degenerate(&self, row_index: usize) -> bool {
    self.row(row_index).first() == Some(&SENTINEL)
  }

  #[must_use]
  pub fn degenerate_rows(&self) -> Vec<usize> {
    (0..self.rows).filter(|&row| self.is_degenerate(row)).collect()
  }

  pub(crate) fn ensure_comparable(
    &self,
    left: usize,
    right: usize,
  ) -> Result<()> {
    for index in [left, right] {
      if index >= self.rows {
        return Err(LshError::invalid(format!(
          "row {index} is out of range for a matrix with {} rows",
          self.rows
        )));
      }
      if self.is_degenerate(index) {
        return Err(LshError::DegenerateSignature { row: index });
      }
    }
    Ok(())
  }

  /// Fraction of columns on which rows `left` and `right` agree, in `[0, 1]`.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] for an out-of-range row and
  /// [`LshError::DegenerateSignature`] if either row is degenerate.
  pub fn agreement(&self, left: usize, right: usize) -> Result<f64> {
    self.ensure_comparable(left, right)?;
    let equal = self
      .row(left)
      .iter()
      .zip(self.row(right))
      .filter(|(a, b)| a == b)
      .count();
    Ok(ratio_usize(equal, self.width))
  }

  /// Encodes the matrix with bincode's standard configuration.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::Snapshot`] if encoding fails.
  pub fn to_bytes(&self) -> Result<Vec<u8>> {
    bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(
      |err| {
        LshError::Snapshot(format!(
          "failed to serialize signature matrix: {err}"
        ))
      },
    )
  }

  /// Decodes a matrix produced by [`SignatureMatrix::to_bytes`] and checks
  /// that the decoded state is consistent.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::Snapshot`] if decoding fails or trailing bytes
  /// remain, and [`LshError::InvalidInput`] if the decoded state is invalid.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    let (decoded, read): (Self, usize) =
      bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .map_err(|err| {
          LshError::Snapshot(format!(
            "failed to decode signature matrix: {err}"
          ))
        })?;
    if read != bytes.len() {
      return Err(LshError::Snapshot(format!(
        "{} trailing bytes after signature matrix",
        bytes.len() - read
      )));
    }
    decoded.validate_state()?;
    Ok(decoded)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> SignatureMatrix {
    SignatureMatrix::from_rows(
      &[vec![1, 2, 3, 4], vec![1, 2, 9, 9], vec![SENTINEL; 4]],
      10,
    )
    .unwrap()
  }

  #[test]
  fn accessors_report_shape_and_cells() {
    let matrix = sample();
    assert_eq!(matrix.rows(), 3);
    assert_eq!(matrix.width(), 4);
    assert_eq!(matrix.get(1, 2), Some(9));
    assert_eq!(matrix.get(3, 0), None);
    assert_eq!(matrix.get(0, 4), None);
    assert_eq!(matrix.degenerate_rows(), vec![2]);
  }

  #[test]
  fn agreement_counts_equal_columns() {
    let matrix = sample();
    assert!((matrix.agreement(0, 1).unwrap() - 0.5).abs() < f64::EPSILON);
    assert!((matrix.agreement(0, 0).unwrap() - 1.0).abs() < f64::EPSILON);
  }

  #[test]
  fn agreement_with_degenerate_row_is_an_error() {
    let matrix = sample();
    assert_eq!(
      matrix.agreement(0, 2),
      Err(LshError::DegenerateSignature { row: 2 })
    );
    assert!(matches!(
      matrix.agreement(0, 7),
      Err(LshError::InvalidInput(_))
    ));
  }

  #[test]
  fn from_rows_rejects_inconsistent_input() {
    assert!(SignatureMatrix::from_rows(&[], 10).is_err());
    assert!(SignatureMatrix::from_rows(&[vec![1, 2], vec![1]], 10).is_err());
    assert!(SignatureMatrix::from_rows(&[vec![10, 2]], 10).is_err());
    assert!(SignatureMatrix::from_rows(&[vec![SENTINEL, 2]], 10).is_err());
  }

  #[test]
  fn snapshot_round_trip_and_validation() {
    let matrix = sample();
    let bytes = matrix.to_bytes().unwrap();
    assert_eq!(SignatureMatrix::from_bytes(&bytes).unwrap(), matrix);

    let mut trailing = bytes.clone();
    trailing.push(0);
    assert!(matches!(
      SignatureMatrix::from_bytes(&trailing),
      Err(LshError::Snapshot(_))
    ));
    assert!(matches!(
      SignatureMatrix::from_bytes(&bytes[..bytes.len() / 2]),
      Err(LshError::Snapshot(_))
    ));

    let corrupt = SignatureMatrix::from_parts(1, 2, 10, vec![3, 11]);
    let bytes = corrupt.to_bytes().unwrap();
    assert!(matches!(
      SignatureMatrix::from_bytes(&bytes),
      Err(LshError::InvalidInput(_))
    ));
  }

  #[derive(Serialize)]
  struct RawMatrix {
    rows: u64,
    width: u64,
    domain_size: u64,
    data: Vec<u64>,
  }

  #[test]
  fn snapshot_with_overflowing_shape_is_rejected() {
    let raw = RawMatrix {
      rows: 1 << 33,
      width: 1 << 31,
      domain_size: 10,
      data: Vec::new(),
    };
    let bytes = bincode::serde::encode_to_vec(&raw, bincode::config::standard())
      .unwrap();
    assert!(matches!(
      SignatureMatrix::from_bytes(&bytes),
      Err(LshError::InvalidInput(_) | LshError::Snapshot(_))
    ));
  }
}
