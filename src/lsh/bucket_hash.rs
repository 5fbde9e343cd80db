use crate::utils::pow_mod;

/// Position-weighted polynomial hash of one band slice:
/// `(sum over p of slice[p]^p) mod bucket_space`.
///
/// Powers are taken modulo `bucket_space`, so large signature values never
/// overflow. `bucket_space` must be non-zero.
#[inline]
#[must_use]
pub fn band_bucket_id(slice: &[u64], bucket_space: u64) -> u64 {
  debug_assert!(bucket_space > 0);
  slice
    .iter()
    .zip(0_u64..)
    .fold(0_u64, |acc, (&value, position)| {
      (acc + pow_mod(value, position, bucket_space)) % bucket_space
    })
}
