pub fn read_env_usize_clamped(
  key: &str,
  default: usize,
  min: usize,
  max: usize,
) -> usize {
  std::env::var(key)
    .ok()
    .and_then(|value| value.trim().parse::<usize>().ok())
    .map_or(default, |parsed| parsed.clamp(min, max))
}

pub fn read_env_u64_clamped(
  key: &str,
  default: u64,
  min: u64,
  max: u64,
) -> u64 {
  std::env::var(key)
    .ok()
    .and_then(|value| value.trim().parse::<u64>().ok())
    .map_or(default, |parsed| parsed.clamp(min, max))
}

pub fn read_env_u64(key: &str) -> Option<u64> {
  std::env::var(key)
    .ok()
    .and_then(|value| value.trim().parse::<u64>().ok())
}
