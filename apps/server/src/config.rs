use std::{env, fmt, time::Duration};

use pingcraft::ProbeConfig;
use pingcraft::config::parse_or;

/// Window shared by the fixed rate-limit tiers
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

pub const GLOBAL_MAX_REQUESTS: u32 = 500;
pub const GENERAL_MAX_REQUESTS: u32 = 100;
pub const BATCH_MAX_REQUESTS: u32 = 10;
pub const PING_MAX_REQUESTS: u32 = 200;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub environment: String,
    pub probe: ProbeConfig,
    pub rate_limit: RateLimitConfig,
}

/// Per-client request budgets, one per tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub general_window: Duration,
    pub general_max: u32,
    pub global_max: u32,
    pub batch_max: u32,
    pub ping_max: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_window: RATE_LIMIT_WINDOW,
            general_max: GENERAL_MAX_REQUESTS,
            global_max: GLOBAL_MAX_REQUESTS,
            batch_max: BATCH_MAX_REQUESTS,
            ping_max: PING_MAX_REQUESTS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3000,
            environment: "development".into(),
            probe: ProbeConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration through `lookup`; bad values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let window_ms = parse_or(
            lookup("RATE_LIMIT_WINDOW_MS"),
            defaults.rate_limit.general_window.as_millis() as u64,
        );

        Self {
            bind: lookup("BIND").filter(|bind| !bind.trim().is_empty()).unwrap_or(defaults.bind),
            port: parse_or(lookup("PORT"), defaults.port),
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
            probe: ProbeConfig::from_lookup(&lookup),
            rate_limit: RateLimitConfig {
                general_window: Duration::from_millis(window_ms.max(1)),
                general_max: parse_or(
                    lookup("RATE_LIMIT_MAX_REQUESTS"),
                    defaults.rate_limit.general_max,
                ),
                ..defaults.rate_limit
            },
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Configuration State:")?;
        write_title_1(f, "Server")?;
        write_1(f, "Bind Address", &self.bind)?;
        write_1(f, "Port", &self.port)?;
        write_1(f, "Environment", &self.environment)?;
        write!(f, "{}", self.probe)?;
        write_title_1(f, "Rate Limits (per client)")?;
        write_1(f, "Global", &format_args!("{}/min", self.rate_limit.global_max))?;
        write_1(
            f,
            "General",
            &format_args!(
                "{}/{} ms",
                self.rate_limit.general_max,
                self.rate_limit.general_window.as_millis()
            ),
        )?;
        write_1(f, "Batch", &format_args!("{}/min", self.rate_limit.batch_max))?;
        write_1(f, "Ping", &format_args!("{}/min", self.rate_limit.ping_max))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.probe, ProbeConfig::default());
        assert_eq!(config.rate_limit, RateLimitConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(|name| match name {
            "PORT" => Some("8080".to_string()),
            "MAX_TIMEOUT" => Some("12000".to_string()),
            "RATE_LIMIT_MAX_REQUESTS" => Some("5".to_string()),
            "RATE_LIMIT_WINDOW_MS" => Some("1000".to_string()),
            "APP_ENV" => Some("production".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 8080);
        assert_eq!(config.probe.max_timeout_ms, 12000);
        assert_eq!(config.rate_limit.general_max, 5);
        assert_eq!(config.rate_limit.general_window, Duration::from_millis(1000));
        assert_eq!(config.rate_limit.batch_max, BATCH_MAX_REQUESTS);
        assert_eq!(config.environment, "production");
    }

    #[test]
    fn test_display_mentions_sections() {
        let rendered = Config::default().to_string();
        assert!(rendered.contains("Bind Address: 0.0.0.0"));
        assert!(rendered.contains("Default Timeout: 5000 ms"));
        assert!(rendered.contains("Batch: 10/min"));
    }
}
