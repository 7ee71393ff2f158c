//! DNS lookup capability.
//!
//! The validator never talks to DNS directly. It calls a [`Resolve`]
//! implementation handed to it by the caller: [`DnsResolver`] for real
//! lookups, [`StaticResolver`] for tests and offline use.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use thiserror::Error;

use crate::config::DEFAULT_DNS_TIMEOUT;
use crate::error::Error;

/// Why a lookup produced no addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no such domain")]
    NotFound,

    #[error("lookup timed out")]
    Timeout,

    #[error("lookup failed: {0}")]
    Failed(String),
}

/// Forward lookup of a hostname to its addresses, in answer order.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError>;
}

#[async_trait]
impl<T: Resolve + ?Sized> Resolve for Arc<T> {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        (**self).lookup(host).await
    }
}

#[async_trait]
impl<T: Resolve + ?Sized> Resolve for &T {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        (**self).lookup(host).await
    }
}

/// Resolver backed by the system DNS configuration.
///
/// Each lookup makes a single attempt bounded by the configured timeout.
#[derive(Clone)]
pub struct DnsResolver {
    inner: TokioResolver,
}

impl DnsResolver {
    pub fn new() -> Result<Self, Error> {
        Self::with_timeout(DEFAULT_DNS_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let mut builder =
            TokioResolver::builder_tokio().map_err(|e| Error::resolver_setup(e.to_string()))?;
        let options = builder.options_mut();
        options.timeout = timeout;
        options.attempts = 1;

        Ok(Self {
            inner: builder.build(),
        })
    }
}

impl std::fmt::Debug for DnsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl Resolve for DnsResolver {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let response = self
            .inner
            .lookup_ip(host)
            .await
            .map_err(|e| ResolveError::Failed(e.to_string()))?;

        Ok(response.iter().collect())
    }
}

/// Resolver answering from a fixed table.
///
/// Hostnames are matched case-insensitively. Unknown hosts fall back to the
/// catch-all answer when one is set, and fail with [`ResolveError::NotFound`]
/// otherwise.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    answers: HashMap<String, Result<Vec<IpAddr>, ResolveError>>,
    fallback: Option<Vec<IpAddr>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every hostname with `addrs`.
    pub fn always(addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            answers: HashMap::new(),
            fallback: Some(addrs.into_iter().collect()),
        }
    }

    pub fn with_host(mut self, host: &str, addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        self.answers
            .insert(host.to_lowercase(), Ok(addrs.into_iter().collect()));
        self
    }

    pub fn with_failure(mut self, host: &str, error: ResolveError) -> Self {
        self.answers.insert(host.to_lowercase(), Err(error));
        self
    }
}

#[async_trait]
impl Resolve for StaticResolver {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        if let Some(answer) = self.answers.get(&host.to_lowercase()) {
            return answer.clone();
        }
        self.fallback.clone().ok_or(ResolveError::NotFound)
    }
}
