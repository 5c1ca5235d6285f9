//! Domain inputs: normalization and the name registry lookup seam.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::LookupError;

/// Longest name the registry accepts.
pub const MAX_DOMAIN_LENGTH: usize = 30;

/// Trim, lowercase, keep only `[a-z0-9]` and truncate to [`MAX_DOMAIN_LENGTH`].
pub fn normalize_domain(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(MAX_DOMAIN_LENGTH)
        .collect()
}

/// Which of the two domain inputs a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainField {
    /// Name for the organization being created. Must be free.
    Create,
    /// Name of an existing organization to open. Must be taken.
    Open,
}

impl DomainField {
    /// Whether availability counts against the input.
    pub fn invert_check(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Map a lookup result to validity for this input.
    pub fn is_valid(self, available: bool) -> bool {
        if self.invert_check() {
            !available
        } else {
            available
        }
    }
}

impl std::fmt::Display for DomainField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "domain"),
            Self::Open => write!(f, "domain_to_open"),
        }
    }
}

/// Name registry lookup.
#[async_trait]
pub trait NameAvailability: Send + Sync {
    /// Whether `name` is still free to register.
    async fn is_name_available(&self, name: &str) -> Result<bool, LookupError>;
}

/// In-memory registry of taken names.
#[derive(Debug, Default, Clone)]
pub struct StaticNameRegistry {
    taken: HashSet<String>,
    latency: Duration,
}

impl StaticNameRegistry {
    pub fn new<I, S>(taken: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            taken: taken
                .into_iter()
                .map(|s| normalize_domain(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect(),
            latency: Duration::ZERO,
        }
    }

    /// Build from a comma-separated `ONBOARDING_TAKEN_NAMES` list.
    pub fn from_env() -> Self {
        let taken = std::env::var("ONBOARDING_TAKEN_NAMES").unwrap_or_default();
        let latency_ms: u64 = std::env::var("ONBOARDING_LOOKUP_LATENCY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        Self::new(taken.split(',')).with_latency(Duration::from_millis(latency_ms))
    }

    /// Delay every lookup, to make debouncing visible when driving by hand.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

#[async_trait]
impl NameAvailability for StaticNameRegistry {
    async fn is_name_available(&self, name: &str) -> Result<bool, LookupError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(!self.taken.contains(name))
    }
}
