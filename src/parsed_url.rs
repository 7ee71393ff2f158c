//! Candidate URL parsing and hostname extraction.

use std::net::IpAddr;

use url::{Host, ParseError, Url};

use crate::error::Rejection;

const SECURE_SCHEME: &str = "https";

/// A candidate URL that passed the syntax, scheme and hostname gates.
///
/// The hostname is normalized (lowercase, no trailing dot). IPv6 literals keep
/// their brackets, as in the URL; use [`ip`](Self::ip) for the address itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    inner: Url,
    host: String,
    ip: Option<IpAddr>,
}

impl ParsedUrl {
    /// Parse a candidate URL.
    ///
    /// Checks run in gate order, so a URL that is both `http` and has a
    /// broken host is reported as [`Rejection::InsecureScheme`].
    ///
    /// # Errors
    ///
    /// - [`Rejection::InvalidFormat`] for input that is not an absolute URL
    ///   with an authority or contains whitespace or control characters
    /// - [`Rejection::InsecureScheme`] for a missing scheme or any scheme other
    ///   than `https`
    /// - [`Rejection::InvalidHostname`] for an empty or unparseable host,
    ///   including octal, hexadecimal, integer, short-form, percent-encoded
    ///   and full-width IPv4 spellings
    ///
    /// Userinfo (`user:pass@`) is allowed here; the gates judge the host that
    /// follows it. See [`has_userinfo`](Self::has_userinfo).
    pub fn parse(input: &str) -> Result<Self, Rejection> {
        if input.is_empty() {
            return Err(Rejection::InvalidFormat);
        }

        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(ParseError::RelativeUrlWithoutBase) => return Err(Rejection::InsecureScheme),
            Err(e) if is_host_error(e) => {
                return Err(if has_secure_scheme(input) {
                    Rejection::InvalidHostname
                } else {
                    Rejection::InsecureScheme
                });
            }
            Err(_) => return Err(Rejection::InvalidFormat),
        };

        if url.scheme() != SECURE_SCHEME {
            return Err(Rejection::InsecureScheme);
        }

        // The parser strips these silently.
        if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Rejection::InvalidFormat);
        }

        let Some(authority) = raw_authority(input) else {
            return Err(Rejection::InvalidFormat);
        };

        // "https:///x" parses with host "x"; the authority itself is empty.
        let raw = raw_host(authority);
        if raw.is_empty() || !is_canonical_host_spelling(raw) {
            return Err(Rejection::InvalidHostname);
        }

        let (host, ip) = match url.host() {
            Some(Host::Domain(domain)) => (normalize_domain(domain)?, None),
            Some(Host::Ipv4(ip)) => {
                // The parser decodes %xx and maps full-width dots before
                // reading the address; only the plain dotted quad is allowed.
                let canonical = ip.to_string();
                if raw.strip_suffix('.').unwrap_or(raw) != canonical {
                    return Err(Rejection::InvalidHostname);
                }
                (canonical, Some(IpAddr::V4(ip)))
            }
            Some(Host::Ipv6(ip)) => (format!("[{}]", ip), Some(IpAddr::V6(ip))),
            None => return Err(Rejection::InvalidHostname),
        };

        Ok(Self {
            inner: url,
            host,
            ip,
        })
    }

    /// Get the normalized hostname.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The address, if the host is an IP literal.
    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }

    /// Whether the URL carries a username or password.
    pub fn has_userinfo(&self) -> bool {
        !self.inner.username().is_empty() || self.inner.password().is_some()
    }

    pub fn scheme(&self) -> &str {
        self.inner.scheme()
    }

    pub fn path(&self) -> &str {
        self.inner.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.inner.query()
    }

    /// Get the full URL as a string.
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Get the underlying URL.
    pub fn into_url(self) -> Url {
        self.inner
    }
}

fn is_host_error(e: ParseError) -> bool {
    matches!(
        e,
        ParseError::EmptyHost
            | ParseError::IdnaError
            | ParseError::InvalidIpv4Address
            | ParseError::InvalidIpv6Address
            | ParseError::InvalidDomainCharacter
    )
}

fn has_secure_scheme(input: &str) -> bool {
    input
        .split_once(':')
        .is_some_and(|(scheme, _)| scheme.eq_ignore_ascii_case(SECURE_SCHEME))
}

/// The authority component of the raw input, or `None` when `https:` is not
/// followed by `//`.
fn raw_authority(input: &str) -> Option<&str> {
    let (scheme, rest) = input.split_once(':')?;
    if !scheme.eq_ignore_ascii_case(SECURE_SCHEME) {
        return None;
    }
    let after_slashes = rest.strip_prefix("//")?;

    // Special schemes treat '\' as a path separator.
    let end = after_slashes
        .find(['/', '\\', '?', '#'])
        .unwrap_or(after_slashes.len());

    Some(&after_slashes[..end])
}

/// Host part of a raw authority, userinfo and port removed.
fn raw_host(authority: &str) -> &str {
    let host_with_port = authority
        .rfind('@')
        .map(|i| &authority[i + 1..])
        .unwrap_or(authority);

    if host_with_port.starts_with('[') {
        return host_with_port
            .find(']')
            .map(|i| &host_with_port[..=i])
            .unwrap_or(host_with_port);
    }

    host_with_port
        .rfind(':')
        .map(|i| &host_with_port[..i])
        .unwrap_or(host_with_port)
}

/// Whether a raw host is either a name or a plain dotted-quad.
///
/// The URL parser reads any host whose last label is numeric as IPv4 and
/// normalizes forms like `0177.0.0.1`, `0x7f.1`, `127.1` and `2130706433` into
/// `127.0.0.1`. Those spellings are refused outright rather than normalized.
fn is_canonical_host_spelling(host: &str) -> bool {
    if host.starts_with('[') {
        return true;
    }

    let host = host.strip_suffix('.').unwrap_or(host);
    let parts: Vec<&str> = host.split('.').collect();

    let Some(last) = parts.last() else {
        return true;
    };
    if !is_numeric_label(last) {
        return true;
    }

    parts.len() == 4 && parts.iter().all(|part| is_canonical_octet(part))
}

fn is_numeric_label(label: &str) -> bool {
    if let Some(hex) = label
        .strip_prefix("0x")
        .or_else(|| label.strip_prefix("0X"))
    {
        return hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    !label.is_empty() && label.chars().all(|c| c.is_ascii_digit())
}

fn is_canonical_octet(part: &str) -> bool {
    if part.is_empty() || part.len() > 3 || !part.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    // Leading zero with more digits reads as octal
    if part.len() > 1 && part.starts_with('0') {
        return false;
    }
    part.parse::<u8>().is_ok()
}

/// Lowercase and drop the FQDN trailing dot.
fn normalize_domain(domain: &str) -> Result<String, Rejection> {
    let mut normalized = domain.to_lowercase();

    if normalized.ends_with('.') {
        normalized.pop();
    }

    if normalized.is_empty() || normalized.starts_with('.') || normalized.contains("..") {
        return Err(Rejection::InvalidHostname);
    }

    Ok(normalized)
}
