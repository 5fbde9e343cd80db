use crate::error::LshError;
use crate::lsh::{band_bucket_id, band_ranges, LshBander};
use crate::signature::{SignatureMatrix, SENTINEL};

fn matrix(rows: &[Vec<u64>]) -> SignatureMatrix {
  SignatureMatrix::from_rows(rows, 1_000).unwrap()
}

#[test]
fn bands_are_disjoint_and_exactly_r_wide() {
  for (width, num_bands) in [(200, 20), (10, 3), (7, 7), (100, 1), (201, 20)] {
    let ranges = band_ranges(width, num_bands).unwrap();
    let r = width / num_bands;
    assert_eq!(ranges.len(), num_bands);
    for (band, range) in ranges.iter().enumerate() {
      assert_eq!(range.start, band * r);
      assert_eq!(range.len(), r);
      assert!(range.end <= width);
    }
    for pair in ranges.windows(2) {
      assert_eq!(pair[0].end, pair[1].start);
    }
  }
}

#[test]
fn too_many_bands_is_invalid_input() {
  assert!(matches!(band_ranges(5, 6), Err(LshError::InvalidInput(_))));
  assert!(matches!(band_ranges(5, 0), Err(LshError::InvalidInput(_))));

  let bander = LshBander::new(4, 97).unwrap();
  let sig = matrix(&[vec![1, 2, 3]]);
  assert!(matches!(bander.band(&sig), Err(LshError::InvalidInput(_))));
}

#[test]
fn bander_rejects_bad_parameters() {
  assert!(LshBander::new(0, 97).is_err());
  assert!(LshBander::new(2, 0).is_err());
  assert!(LshBander::new(2, u64::from(u32::MAX) + 1).is_err());
}

#[test]
fn identical_band_slices_share_a_bucket() {
  let sig = matrix(&[
    vec![1, 2, 3, 4, 5, 6],
    vec![1, 2, 3, 9, 9, 9],
    vec![7, 8, 9, 4, 5, 6],
  ]);
  let buckets = LshBander::new(2, 104_729).unwrap().band(&sig).unwrap();
  assert_eq!(buckets.num_bands(), 2);
  assert_eq!(buckets.rows_per_band(), 3);

  let first_band_id = band_bucket_id(&[1, 2, 3], 104_729);
  assert_eq!(buckets.bucket(0, first_band_id), Some(&[0, 1][..]));
  let second_band_id = band_bucket_id(&[4, 5, 6], 104_729);
  assert_eq!(buckets.bucket(1, second_band_id), Some(&[0, 2][..]));

  assert_eq!(buckets.bucket_of(0, 0), Some(first_band_id));
  assert_eq!(buckets.bucket_of(1, 2), Some(second_band_id));
  assert_eq!(buckets.bucket_of(2, 0), None);
}

#[test]
fn every_item_lands_in_exactly_one_bucket_per_band() {
  let sig = matrix(&[
    vec![1, 2, 3, 4],
    vec![5, 6, 7, 8],
    vec![1, 2, 7, 8],
    vec![9, 9, 9, 9],
  ]);
  let buckets = LshBander::new(2, 101).unwrap().band(&sig).unwrap();
  for (_, table) in buckets.iter() {
    let mut items: Vec<usize> = table.values().flatten().copied().collect();
    items.sort_unstable();
    assert_eq!(items, vec![0, 1, 2, 3]);
  }
}

#[test]
fn trailing_columns_are_ignored() {
  // width 5, 2 bands -> r = 2, column 4 unused.
  let sig = matrix(&[vec![1, 2, 3, 4, 100], vec![1, 2, 3, 4, 200]]);
  let buckets = LshBander::new(2, 104_729).unwrap().band(&sig).unwrap();
  for band in 0..2 {
    assert_eq!(buckets.bucket_of(band, 0), buckets.bucket_of(band, 1));
  }
}

#[test]
fn degenerate_rows_are_excluded() {
  let sig = matrix(&[vec![SENTINEL; 4], vec![1, 2, 3, 4], vec![SENTINEL; 4]]);
  let buckets = LshBander::new(2, 97).unwrap().band(&sig).unwrap();
  assert_eq!(buckets.degenerate_items(), &[0, 2]);
  for (_, table) in buckets.iter() {
    let items: Vec<usize> = table.values().flatten().copied().collect();
    assert_eq!(items, vec![1]);
  }
  assert_eq!(buckets.bucket_of(0, 0), None);
}
