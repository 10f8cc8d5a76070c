use std::{env, fmt, str::FromStr};

/// Lower bound for any probe timeout, in milliseconds
pub const MIN_TIMEOUT_MS: u64 = 1_000;

/// Timeout used when the caller does not provide one, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Upper bound for any probe timeout, in milliseconds
pub const MAX_TIMEOUT_MS: u64 = 30_000;

/// Highest accepted `MAX_TIMEOUT`, in milliseconds
pub const TIMEOUT_CEILING_MS: u64 = 300_000;

/// Maximum number of targets in one batch
pub const MAX_BATCH_SIZE: usize = 10;

/// Read-only probe settings shared by every request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    pub default_timeout_ms: u64,
    pub min_timeout_ms: u64,
    pub max_timeout_ms: u64,
    pub max_batch_size: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            min_timeout_ms: MIN_TIMEOUT_MS,
            max_timeout_ms: MAX_TIMEOUT_MS,
            max_batch_size: MAX_BATCH_SIZE,
        }
    }
}

impl ProbeConfig {
    /// Build the config from `DEFAULT_TIMEOUT` and `MAX_TIMEOUT`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    ///
    /// Missing or unparseable values fall back to the defaults. The ceiling is
    /// never below the fixed floor and the default always lies in between.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let max_timeout_ms = parse_or(lookup("MAX_TIMEOUT"), defaults.max_timeout_ms)
            .clamp(MIN_TIMEOUT_MS, TIMEOUT_CEILING_MS);
        let default_timeout_ms = parse_or(lookup("DEFAULT_TIMEOUT"), defaults.default_timeout_ms)
            .clamp(MIN_TIMEOUT_MS, max_timeout_ms);

        Self { default_timeout_ms, max_timeout_ms, ..defaults }
    }

    /// Clamp a requested timeout into the configured bounds
    pub fn clamp_timeout(&self, timeout_ms: i64) -> u64 {
        let max = self.max_timeout_ms.max(self.min_timeout_ms);
        u64::try_from(timeout_ms).unwrap_or(0).clamp(self.min_timeout_ms, max)
    }
}

impl fmt::Display for ProbeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Probe")?;
        writeln!(f, "    Default Timeout: {} ms", self.default_timeout_ms)?;
        writeln!(f, "    Timeout Range: {}-{} ms", self.min_timeout_ms, self.max_timeout_ms)?;
        writeln!(f, "    Max Batch Size: {}", self.max_batch_size)
    }
}

/// Parse an optional raw value, falling back to `default`
pub fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(default)
}
