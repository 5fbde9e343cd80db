//! Fixed families of linear hash functions `h(x) = (a*x + b) mod domain`.
//!
//! Each function draws its coefficients exactly once, when the family is
//! generated, and is pure afterwards. A function therefore behaves as one
//! consistent permutation simulator over the whole universe scan, which is
//! what the MinHash minimum argument requires.

use crate::error::{LshError, Result};
use crate::utils::affine_mod;
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

/// One linear hash function with coefficients fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHashFunction")]
pub struct HashFunction {
  a: u64,
  b: u64,
  domain_size: u64,
}

#[derive(Deserialize)]
struct RawHashFunction {
  a: u64,
  b: u64,
  domain_size: u64,
}

impl TryFrom<RawHashFunction> for HashFunction {
  type Error = LshError;

  fn try_from(raw: RawHashFunction) -> Result<Self> {
    Self::new(raw.a, raw.b, raw.domain_size)
  }
}

impl HashFunction {
  /// Builds a function from explicit coefficients.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `domain_size` is zero.
  pub fn new(a: u64, b: u64, domain_size: u64) -> Result<Self> {
    if domain_size == 0 {
      return Err(LshError::invalid("domain_size must be greater than 0"));
    }
    Ok(Self { a, b, domain_size })
  }

  /// `(a * x + b) mod domain_size`, always in `[0, domain_size)`.
  #[inline]
  #[must_use]
  pub const fn apply(&self, x: u64) -> u64 {
    affine_mod(self.a, x, self.b, self.domain_size)
  }

  #[must_use]
  pub const fn coefficients(&self) -> (u64, u64) {
    (self.a, self.b)
  }

  #[must_use]
  pub const fn domain_size(&self) -> u64 {
    self.domain_size
  }
}

/// An ordered, immutable sequence of `k` independent [`HashFunction`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHashFamily")]
pub struct HashFamily {
  functions: Vec<HashFunction>,
  domain_size: u64,
}

#[derive(Deserialize)]
struct RawHashFamily {
  functions: Vec<HashFunction>,
  domain_size: u64,
}

impl TryFrom<RawHashFamily> for HashFamily {
  type Error = LshError;

  fn try_from(raw: RawHashFamily) -> Result<Self> {
    let family = Self::from_functions(raw.functions)?;
    if family.domain_size != raw.domain_size {
      return Err(LshError::invalid(format!(
        "family domain_size {} does not match its functions ({})",
        raw.domain_size, family.domain_size
      )));
    }
    Ok(family)
  }
}

impl HashFamily {
  fn validate_params(k: usize, domain_size: u64) -> Result<()> {
    if k == 0 {
      return Err(LshError::invalid(
        "a hash family needs at least one hash function",
      ));
    }
    if domain_size == 0 {
      return Err(LshError::invalid("domain_size must be greater than 0"));
    }
    Ok(())
  }

  /// Draws `k` coefficient pairs from `rng`.
  ///
  /// `a` is drawn from `[1, domain_size)` (or is 1 for a unit domain) and `b`
  /// from `[0, domain_size)`.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `k` or `domain_size` is zero.
  pub fn generate<R: RngCore + ?Sized>(
    k: usize,
    domain_size: u64,
    rng: &mut R,
  ) -> Result<Self> {
    Self::validate_params(k, domain_size)?;
    let functions = (0..k)
      .map(|_| {
        let a = if domain_size > 1 {
          rng.random_range(1..domain_size)
        } else {
          1
        };
        let b = rng.random_range(0..domain_size);
        HashFunction { a, b, domain_size }
      })
      .collect();
    Ok(Self {
      functions,
      domain_size,
    })
  }

  /// Reproducible family: the same `(k, domain_size, seed)` always yields the
  /// same coefficients.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `k` or `domain_size` is zero.
  pub fn with_seed(k: usize, domain_size: u64, seed: u64) -> Result<Self> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    Self::generate(k, domain_size, &mut rng)
  }

  /// Family seeded from the thread-local entropy source.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `k` or `domain_size` is zero.
  pub fn from_entropy(k: usize, domain_size: u64) -> Result<Self> {
    Self::with_seed(k, domain_size, rand::random())
  }

  /// Seeded when `seed` is `Some`, entropy-seeded otherwise.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `k` or `domain_size` is zero.
  pub fn from_optional_seed(
    k: usize,
    domain_size: u64,
    seed: Option<u64>,
  ) -> Result<Self> {
    seed.map_or_else(
      || Self::from_entropy(k, domain_size),
      |seed| Self::with_seed(k, domain_size, seed),
    )
  }

  /// Wraps explicit functions; they must all share one domain.
  ///
  /// # Errors
  ///
  /// Returns [`LshError::InvalidInput`] if `functions` is empty or the
  /// domains disagree.
  pub fn from_functions(functions: Vec<HashFunction>) -> Result<Self> {
    let domain_size = functions.first().map_or(0, HashFunction::domain_size);
    Self::validate_params(functions.len(), domain_size)?;
    if functions.iter().any(|f| f.domain_size != domain_size) {
      return Err(LshError::invalid(
        "every hash function in a family must share one domain_size",
      ));
    }
    Ok(Self {
      functions,
      domain_size,
    })
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.functions.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.functions.is_empty()
  }

  #[must_use]
  pub const fn domain_size(&self) -> u64 {
    self.domain_size
  }

  #[must_use]
  pub fn get(&self, index: usize) -> Option<&HashFunction> {
    self.functions.get(index)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, HashFunction> {
    self.functions.iter()
  }

  /// Writes `h(x)` for every function into `out`, which must have `len()`
  /// slots.
  #[inline]
  pub(crate) fn apply_all(&self, x: u64, out: &mut [u64]) {
    debug_assert_eq!(out.len(), self.functions.len());
    for (slot, function) in out.iter_mut().zip(&self.functions) {
      *slot = function.apply(x);
    }
  }
}

impl<'a> IntoIterator for &'a HashFamily {
  type Item = &'a HashFunction;
  type IntoIter = std::slice::Iter<'a, HashFunction>;

  fn into_iter(self) -> Self::IntoIter {
    self.functions.iter()
  }
}
