//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Timing and naming knobs for the onboarding controller.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Quiet period after the last keystroke before a domain is looked up.
    pub domain_check_debounce: Duration,
    /// Delay before a failed lookup is retried.
    pub domain_check_retry: Duration,
    /// Delay between a successful DAO creation and the automatic step forward.
    pub auto_advance_delay: Duration,
    /// Registry suffix appended to a domain when opening an existing organization.
    pub domain_suffix: String,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            domain_check_debounce: Duration::from_millis(300),
            domain_check_retry: Duration::from_millis(1000),
            auto_advance_delay: Duration::from_millis(1000),
            domain_suffix: "aragonid.eth".to_string(),
        }
    }
}

impl OnboardingConfig {
    /// Build from `ONBOARDING_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let domain_check_debounce =
            millis_from_env("ONBOARDING_DEBOUNCE_MS")?.unwrap_or(defaults.domain_check_debounce);
        let domain_check_retry =
            millis_from_env("ONBOARDING_RETRY_MS")?.unwrap_or(defaults.domain_check_retry);
        let auto_advance_delay =
            millis_from_env("ONBOARDING_AUTO_ADVANCE_MS")?.unwrap_or(defaults.auto_advance_delay);

        let domain_suffix = std::env::var("ONBOARDING_DOMAIN_SUFFIX")
            .ok()
            .map(|s| s.trim().trim_start_matches('.').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.domain_suffix);

        Ok(Self {
            domain_check_debounce,
            domain_check_retry,
            auto_advance_delay,
            domain_suffix,
        })
    }
}

fn millis_from_env(key: &str) -> Result<Option<Duration>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => parse_millis(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected milliseconds, got {raw:?} ({e})"),
        })
}
