//! Text preprocessing that feeds the fingerprint stage.
//!
//! These helpers turn raw text into shingle strings. The signature and LSH
//! stages never look at text; they only consume the fingerprints produced
//! from these shingles.

use crate::error::{LshError, Result};
use rustc_hash::FxHashSet;

const DEFAULT_STOP_WORDS: [&str; 8] =
  ["to", "that", "a", "for", "the", "have", "it", "is"];

/// Case-insensitive stop-word list.
#[derive(Debug, Clone)]
pub struct StopWords {
  words: FxHashSet<String>,
}

impl Default for StopWords {
  fn default() -> Self {
    Self::new(DEFAULT_STOP_WORDS)
  }
}

impl StopWords {
  pub fn new<I, S>(words: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self {
      words: words
        .into_iter()
        .map(|word| word.as_ref().to_lowercase())
        .collect(),
    }
  }

  #[must_use]
  pub fn contains(&self, word: &str) -> bool {
    self.words.contains(&word.to_lowercase())
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.words.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }
}

/// Lowercases, drops punctuation and collapses whitespace runs to one space.
#[must_use]
pub fn normalize(text: &str) -> String {
  let mut normalized = String::with_capacity(text.len());
  for word in text.split_whitespace() {
    let cleaned: String = word
      .chars()
      .filter(|c| c.is_alphanumeric())
      .flat_map(char::to_lowercase)
      .collect();
    if cleaned.is_empty() {
      continue;
    }
    if !normalized.is_empty() {
      normalized.push(' ');
    }
    normalized.push_str(&cleaned);
  }
  normalized
}

fn validate_shingle_size(k: usize) -> Result<()> {
  if k == 0 {
    return Err(LshError::invalid("shingle size must be greater than 0"));
  }
  Ok(())
}

fn char_windows(chars: &[char], k: usize) -> Vec<String> {
  if chars.len() < k {
    return Vec::new();
  }
  chars.windows(k).map(|window| window.iter().collect()).collect()
}

/// Overlapping k-character shingles of the normalized text.
///
/// # Errors
///
/// Returns [`LshError::InvalidInput`] if `k` is zero.
pub fn char_shingles(text: &str, k: usize) -> Result<Vec<String>> {
  validate_shingle_size(k)?;
  let chars: Vec<char> = normalize(text).chars().collect();
  Ok(char_windows(&chars, k))
}

/// Overlapping k-character shingles with every non-alphanumeric character,
/// whitespace included, removed first.
///
/// # Errors
///
/// Returns [`LshError::InvalidInput`] if `k` is zero.
pub fn compact_char_shingles(text: &str, k: usize) -> Result<Vec<String>> {
  validate_shingle_size(k)?;
  let chars: Vec<char> = text
    .chars()
    .filter(|c| c.is_alphanumeric())
    .flat_map(char::to_lowercase)
    .collect();
  Ok(char_windows(&chars, k))
}

/// Removes every stop word, keeping the remaining words space separated.
#[must_use]
pub fn remove_stop_words(text: &str, stop_words: &StopWords) -> String {
  text
    .split_whitespace()
    .filter(|word| !stop_words.contains(word))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Compact character shingles taken after stop-word removal.
///
/// # Errors
///
/// Returns [`LshError::InvalidInput`] if `k` is zero.
pub fn stop_word_char_shingles(
  text: &str,
  k: usize,
  stop_words: &StopWords,
) -> Result<Vec<String>> {
  compact_char_shingles(&remove_stop_words(text, stop_words), k)
}

/// Spot-signature shingles: each stop word joined with up to two following
/// words.
#[must_use]
pub fn spot_shingles(text: &str, stop_words: &StopWords) -> Vec<String> {
  let words: Vec<String> = normalize(text)
    .split(' ')
    .filter(|word| !word.is_empty())
    .map(str::to_owned)
    .collect();

  words
    .iter()
    .enumerate()
    .filter(|(_, word)| stop_words.contains(word))
    .map(|(i, _)| words[i..words.len().min(i + 3)].join(" "))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_strips_punctuation_and_case() {
    assert_eq!(
      normalize("  The CAT,  sat!\n on-the mat. "),
      "the cat sat onthe mat"
    );
    assert_eq!(normalize("!!! ..."), "");
  }

  #[test]
  fn char_shingles_keep_single_spaces() {
    let shingles = char_shingles("the cat", 3).unwrap();
    assert_eq!(shingles, vec!["the", "he ", "e c", " ca", "cat"]);
  }

  #[test]
  fn compact_shingles_drop_whitespace() {
    let shingles = compact_char_shingles("ab cd", 3).unwrap();
    assert_eq!(shingles, vec!["abc", "bcd"]);
  }

  #[test]
  fn text_shorter_than_k_has_no_shingles() {
    assert!(char_shingles("ab", 3).unwrap().is_empty());
    assert!(compact_char_shingles("", 1).unwrap().is_empty());
  }

  #[test]
  fn zero_k_is_rejected() {
    assert!(matches!(
      char_shingles("abc", 0),
      Err(LshError::InvalidInput(_))
    ));
    assert!(matches!(
      compact_char_shingles("abc", 0),
      Err(LshError::InvalidInput(_))
    ));
  }

  #[test]
  fn stop_words_are_case_insensitive() {
    let stop_words = StopWords::default();
    assert!(stop_words.contains("The"));
    assert!(!stop_words.contains("cat"));
    assert_eq!(
      remove_stop_words("The cat is on the mat", &stop_words),
      "cat on mat"
    );
    assert_eq!(
      stop_word_char_shingles("The cat is on the mat", 3, &stop_words)
        .unwrap()
        .first()
        .map(String::as_str),
      Some("cat")
    );
  }

  #[test]
  fn spot_shingles_take_two_following_words() {
    let shingles =
      spot_shingles("It rains in the north of the", &StopWords::default());
    assert_eq!(shingles, vec!["it rains in", "the north of", "the"]);
  }
}
