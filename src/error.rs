//! Error and rejection types for urlgate.

use std::net::IpAddr;

use thiserror::Error;

use crate::classify::IpClass;

/// Why a candidate URL was refused.
///
/// Rejections are ordinary outcomes of [`validate`](crate::validate), not
/// faults. The `Display` text is safe to show to the submitting user; it never
/// includes resolver diagnostics or resolved addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Invalid URL format.")]
    InvalidFormat,

    #[error("Only HTTPS URLs are allowed.")]
    InsecureScheme,

    #[error("Invalid hostname.")]
    InvalidHostname,

    #[error("Localhost URLs are not allowed.")]
    LocalhostBlocked,

    #[error("Private or restricted IP addresses are not allowed.")]
    RestrictedIpLiteral { ip: IpAddr, class: IpClass },

    #[error("Domain cannot be resolved.")]
    UnresolvableDomain,

    #[error("Domain resolves to restricted IP address.")]
    RestrictedIpViaDns { ip: IpAddr, class: IpClass },

    #[error("Domain is blacklisted.")]
    BlacklistedDomain,

    #[error("URL exceeds maximum allowed length of {max} characters.")]
    TooLong { len: usize, max: usize },
}

impl Rejection {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::InvalidFormat => "invalid_format",
            Rejection::InsecureScheme => "insecure_scheme",
            Rejection::InvalidHostname => "invalid_hostname",
            Rejection::LocalhostBlocked => "localhost_blocked",
            Rejection::RestrictedIpLiteral { .. } => "restricted_ip_literal",
            Rejection::UnresolvableDomain => "unresolvable_domain",
            Rejection::RestrictedIpViaDns { .. } => "restricted_ip_via_dns",
            Rejection::BlacklistedDomain => "blacklisted_domain",
            Rejection::TooLong { .. } => "too_long",
        }
    }
}

/// Internal faults. Bad input never produces one of these.
#[derive(Debug, Error)]
pub enum Error {
    /// The system DNS configuration could not be loaded.
    #[error("DNS resolver setup failed: {message}")]
    ResolverSetup { message: String },

    /// Unexpected failure outside of validation itself.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    pub(crate) fn resolver_setup(message: impl Into<String>) -> Self {
        Self::ResolverSetup {
            message: message.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
