//! # urlgate
//!
//! Admission gate for URLs submitted to a URL shortener.
//!
//! `urlgate` decides whether a user-supplied long URL may be stored and later
//! redirected to. It refuses anything that could turn the service into an
//! SSRF pivot (loopback, private, link-local and reserved destinations,
//! whether written literally or reached through DNS) and anything on a
//! caller-supplied malware blacklist. It does not make HTTP requests.
//!
//! The DNS resolver and the blacklist are supplied by the caller, so the
//! gate is stateless and can be tested without a network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use urlgate::{validate, Blacklist, Decision, DnsResolver};
//!
//! # async fn example() -> Result<(), urlgate::Error> {
//! let resolver = DnsResolver::new()?;
//! let blacklist: Blacklist = ["malware.example"].into_iter().collect();
//!
//! match validate("https://example.com/api", &blacklist, &resolver).await? {
//!     Decision::Accepted(url) => println!("storing {}", url.url),
//!     Decision::Rejected(reason) => println!("refused ({}): {}", reason.code(), reason),
//! }
//! # Ok(())
//! # }
//! ```

mod blacklist;
mod classify;
mod config;
mod error;
mod parsed_url;
mod resolver;
mod validate;

pub use blacklist::Blacklist;
pub use classify::{classify, IpClass};
pub use config::{AddressCheck, Config, DEFAULT_DNS_TIMEOUT, MAX_URL_LENGTH};
pub use error::{Error, Rejection};
pub use parsed_url::ParsedUrl;
pub use resolver::{DnsResolver, Resolve, ResolveError, StaticResolver};
pub use validate::{validate, validate_sync, Decision, Validated, Validator};
