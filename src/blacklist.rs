//! Known-malicious domains.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// A set of blacklisted domains.
///
/// Entries are stored lowercase without a trailing dot, and membership is
/// exact: `evil.com` matches `evil.com` and `EVIL.com.` but not
/// `cdn.evil.com`. An entry written `*.evil.com` matches `evil.com` and every
/// name below it. [`covering_entry`](Self::covering_entry) extends that
/// subdomain coverage to every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    domains: HashSet<String>,
    wildcards: HashSet<String>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a domain. Returns `false` if it was already present or is empty.
    pub fn insert(&mut self, domain: &str) -> bool {
        match normalize_entry(domain) {
            Some(Entry::Exact(entry)) => self.domains.insert(entry),
            Some(Entry::Wildcard(entry)) => self.wildcards.insert(entry),
            None => false,
        }
    }

    /// Check a hostname against the blacklist, case-insensitively.
    pub fn contains(&self, host: &str) -> bool {
        self.matching_entry(host).is_some()
    }

    /// Like [`contains`](Self::contains), with every entry also covering its
    /// subdomains.
    pub fn covers(&self, host: &str) -> bool {
        self.covering_entry(host).is_some()
    }

    /// The entry `host` is listed under: an exact entry, or a `*.` entry for
    /// the host or one of its parents.
    pub fn matching_entry(&self, host: &str) -> Option<&str> {
        if self.is_empty() {
            return None;
        }

        let host = normalize_host(host);
        if let Some(entry) = self.domains.get(host.as_str()) {
            return Some(entry.as_str());
        }
        let entry = suffixes(&host).find_map(|name| self.wildcards.get(name).map(String::as_str));
        entry
    }

    /// The entry equal to `host` or to one of its parent domains, if any.
    pub fn covering_entry(&self, host: &str) -> Option<&str> {
        if self.is_empty() {
            return None;
        }

        let host = normalize_host(host);
        let entry = suffixes(&host).find_map(|name| {
            self.domains
                .get(name)
                .or_else(|| self.wildcards.get(name))
                .map(String::as_str)
        });
        entry
    }

    pub fn len(&self) -> usize {
        self.domains.len() + self.wildcards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.wildcards.is_empty()
    }

    /// Read one domain per line. Blank lines and `#` comments are skipped.
    pub fn from_reader(reader: impl BufRead) -> io::Result<Self> {
        let mut blacklist = Self::new();
        for line in reader.lines() {
            let line = line?;
            let entry = line.split('#').next().unwrap_or_default();
            blacklist.insert(entry);
        }
        Ok(blacklist)
    }

    /// Load a blacklist file in the [`from_reader`](Self::from_reader) format.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<S: AsRef<str>> FromIterator<S> for Blacklist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut blacklist = Self::new();
        blacklist.extend(iter);
        blacklist
    }
}

impl<S: AsRef<str>> Extend<S> for Blacklist {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for domain in iter {
            self.insert(domain.as_ref());
        }
    }
}

enum Entry {
    Exact(String),
    Wildcard(String),
}

fn normalize_entry(domain: &str) -> Option<Entry> {
    let trimmed = domain.trim();
    let (trimmed, wildcard) = match trimmed.strip_prefix("*.") {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };
    let trimmed = trimmed.trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }

    let entry = trimmed.to_lowercase();
    Some(if wildcard {
        Entry::Wildcard(entry)
    } else {
        Entry::Exact(entry)
    })
}

fn normalize_host(host: &str) -> String {
    host.trim_end_matches('.').to_lowercase()
}

/// `a.b.c`, `b.c`, `c`.
fn suffixes(host: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(host), |&name| {
        name.split_once('.')
            .map(|(_, parent)| parent)
            .filter(|parent| !parent.is_empty())
    })
}
