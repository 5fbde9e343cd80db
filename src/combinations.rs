//! "Choose k of n" helpers used when turning bucket collisions into pairs.

/// Number of unordered pairs among `n` items, saturating at `usize::MAX`.
#[must_use]
pub const fn pair_count(n: usize) -> usize {
  if n < 2 {
    return 0;
  }
  // One of n, n - 1 is even; halve it first so the product rarely saturates.
  if n % 2 == 0 {
    (n / 2).saturating_mul(n - 1)
  } else {
    n.saturating_mul((n - 1) / 2)
  }
}

/// All `k`-element combinations of `items`, in lexicographic index order.
///
/// Empty when `k == 0` or `k > items.len()`; a single combination holding
/// every item when `k == items.len()`.
#[must_use]
pub fn k_combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
  let n = items.len();
  if k == 0 || k > n {
    return Vec::new();
  }

  let mut combinations = Vec::new();
  let mut indices: Vec<usize> = (0..k).collect();
  loop {
    combinations.push(indices.iter().map(|&i| items[i].clone()).collect());

    // Rightmost index that can still move forward.
    let Some(pivot) = (0..k).rev().find(|&slot| indices[slot] != slot + n - k)
    else {
      return combinations;
    };
    indices[pivot] += 1;
    for slot in pivot + 1..k {
      indices[slot] = indices[slot - 1] + 1;
    }
  }
}

/// Iterates every unordered pair `(items[i], items[j])` with `i < j`.
///
/// This is the `k = 2` case of [`k_combinations`], yielded lazily and in the
/// same order without allocating a vector per combination.
pub fn pairs<T: Copy>(items: &[T]) -> impl Iterator<Item = (T, T)> + '_ {
  items.iter().enumerate().flat_map(move |(i, &left)| {
    items[i + 1..].iter().map(move |&right| (left, right))
  })
}
