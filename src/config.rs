//! Validator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest accepted candidate URL, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Upper bound on a single DNS lookup.
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// Which resolved addresses must be public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressCheck {
    /// Every returned address must be public.
    #[default]
    All,
    /// Only the first returned address is inspected.
    First,
}

/// Validator settings. Every field is optional in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_url_length: usize,
    pub dns_timeout_ms: u64,
    pub resolved_addresses: AddressCheck,
    /// Refuse URLs carrying `user:pass@` as `InvalidFormat`.
    pub reject_userinfo: bool,
    /// Let every blacklist entry cover its subdomains too.
    pub blacklist_subdomains: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_url_length: MAX_URL_LENGTH,
            dns_timeout_ms: DEFAULT_DNS_TIMEOUT.as_millis() as u64,
            resolved_addresses: AddressCheck::All,
            reject_userinfo: false,
            blacklist_subdomains: false,
        }
    }
}

impl Config {
    pub fn dns_timeout(&self) -> Duration {
        Duration::from_millis(self.dns_timeout_ms)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}
