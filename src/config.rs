use anyhow::{bail, Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    // Location the prayer times are fetched for
    pub city: String,
    pub country: String,

    // AlAdhan calculation method (13 = Diyanet, Turkey)
    pub calc_method: u8,

    // IANA zone used to sample "now"; anchor values are never converted
    pub timezone: Tz,

    // Fixed end-of-workday boundary
    pub work_end: NaiveTime,

    // Provider request timeout
    pub fetch_timeout_secs: u64,

    // Period of the unattended retry while the fetch is failing
    pub retry_interval_secs: u64,

    // Overridable so tests can point at a mock server
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env if present, ignore if missing
        Self::from_getter(|key| env::var(key).ok())
    }

    /// Parse config from a custom getter function (for testing)
    pub fn from_getter<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            city: get("CITY").unwrap_or_else(|| "Ankara".to_string()),
            country: get("COUNTRY").unwrap_or_else(|| "Turkey".to_string()),

            calc_method: get("CALC_METHOD")
                .unwrap_or_else(|| "13".to_string())
                .parse()
                .context("CALC_METHOD must be a small integer")?,

            timezone: get("TIMEZONE")
                .unwrap_or_else(|| "Europe/Istanbul".to_string())
                .parse()
                .map_err(|e: chrono_tz::ParseError| anyhow::anyhow!("TIMEZONE is not a known IANA zone: {}", e))?,

            work_end: NaiveTime::parse_from_str(
                &get("WORK_END").unwrap_or_else(|| "17:00:00".to_string()),
                "%H:%M:%S",
            )
            .context("WORK_END must be HH:MM:SS")?,

            fetch_timeout_secs: get("FETCH_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            retry_interval_secs: get("RETRY_INTERVAL_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),

            api_base_url: get("API_BASE_URL")
                .unwrap_or_else(|| "https://api.aladhan.com".to_string()),
        })
    }

    /// Create config from a HashMap (convenience for testing)
    #[cfg(test)]
    pub fn from_map(map: &std::collections::HashMap<&str, &str>) -> Result<Self> {
        Self::from_getter(|key| map.get(key).map(|v| v.to_string()))
    }

    /// Validate configuration values at startup.
    /// Returns Ok(()) if all validations pass, or Err with details of what failed.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.city.trim().is_empty() {
            errors.push("CITY cannot be empty.".to_string());
        }

        if self.country.trim().is_empty() {
            errors.push("COUNTRY cannot be empty.".to_string());
        }

        if self.fetch_timeout_secs == 0 {
            errors.push("FETCH_TIMEOUT_SECS must be greater than 0.".to_string());
        } else if self.fetch_timeout_secs > 60 {
            errors.push(format!(
                "FETCH_TIMEOUT_SECS={} seems too long (max recommended: 60).",
                self.fetch_timeout_secs
            ));
        }

        if self.retry_interval_secs == 0 {
            errors.push("RETRY_INTERVAL_SECS must be greater than 0.".to_string());
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            errors.push(format!(
                "API_BASE_URL '{}' must start with http:// or https://.",
                self.api_base_url
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )
        }
    }
}
