#[inline]
#[allow(clippy::cast_precision_loss)]
pub fn usize_to_f64(value: usize) -> f64 {
  value as f64
}

#[inline]
pub fn ratio_usize(numerator: usize, denominator: usize) -> f64 {
  if denominator == 0 {
    0.0
  } else {
    usize_to_f64(numerator) / usize_to_f64(denominator)
  }
}

/// `numerator / denominator` expressed as a percentage in `[0, 100]`.
#[inline]
pub fn percentage(numerator: usize, denominator: usize) -> f64 {
  ratio_usize(numerator, denominator) * 100.0
}

/// `(a * b) mod modulus` without overflow. `modulus` must be non-zero.
#[inline]
pub const fn mul_mod(a: u64, b: u64, modulus: u64) -> u64 {
  let product = (a as u128) * (b as u128);
  (product % (modulus as u128)) as u64
}

/// `(a * x + b) mod modulus` without overflow. `modulus` must be non-zero.
#[inline]
pub const fn affine_mod(a: u64, x: u64, b: u64, modulus: u64) -> u64 {
  let value = (a as u128) * (x as u128) + (b as u128);
  (value % (modulus as u128)) as u64
}

/// `base^exponent mod modulus` by square-and-multiply. `0^0` is 1.
#[inline]
pub const fn pow_mod(base: u64, mut exponent: u64, modulus: u64) -> u64 {
  if modulus == 1 {
    return 0;
  }
  let mut result = 1_u64;
  let mut base = base % modulus;
  while exponent > 0 {
    if exponent & 1 == 1 {
      result = mul_mod(result, base, modulus);
    }
    base = mul_mod(base, base, modulus);
    exponent >>= 1;
  }
  result
}
