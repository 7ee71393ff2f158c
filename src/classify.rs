//! IP address classification.
//!
//! Every address the gate looks at, whether it came from the URL itself or
//! from DNS, goes through [`classify`]. IPv6 addresses that embed an IPv4
//! address (mapped, translated, compatible, NAT64, 6to4) are classified by the
//! embedded IPv4. Only `2000::/3` global unicast can be public on the IPv6
//! side; everything outside it, unique local and link-local aside, is reserved.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use ipnet::{Ipv4Net, Ipv6Net};

/// Reachability class of an IP address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpClass {
    /// Globally routable.
    Public,
    /// RFC 1918, shared address space (100.64.0.0/10) and IPv6 unique local.
    Private,
    /// 127.0.0.0/8 and ::1.
    Loopback,
    /// 169.254.0.0/16 and fe80::/10.
    LinkLocal,
    /// Unspecified, multicast, documentation, benchmarking and other special-use
    /// ranges, plus IPv6 space outside `2000::/3`.
    Reserved,
}

impl IpClass {
    pub fn is_public(self) -> bool {
        self == IpClass::Public
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IpClass::Public => "public",
            IpClass::Private => "private",
            IpClass::Loopback => "loopback",
            IpClass::LinkLocal => "link-local",
            IpClass::Reserved => "reserved",
        }
    }
}

impl fmt::Display for IpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SHARED_V4: &str = "100.64.0.0/10";

const RESERVED_V4: &[&str] = &[
    "0.0.0.0/8",       // "this network"
    "192.0.0.0/24",    // IETF protocol assignments
    "192.0.2.0/24",    // TEST-NET-1
    "198.18.0.0/15",   // benchmarking
    "198.51.100.0/24", // TEST-NET-2
    "203.0.113.0/24",  // TEST-NET-3
    "224.0.0.0/4",     // multicast
    "240.0.0.0/4",     // future use, includes 255.255.255.255
];

const RESERVED_V6: &[&str] = &[
    "ff00::/8",      // multicast
    "2001::/23",     // IETF protocol assignments, includes Teredo 2001::/32
    "2001:10::/28",  // ORCHID
    "2001:db8::/32", // documentation
    "100::/64",      // discard
    "fec0::/10",     // deprecated site-local
];

static SHARED_V4_NET: LazyLock<Ipv4Net> =
    LazyLock::new(|| SHARED_V4.parse().expect("shared address range literal"));

static RESERVED_V4_NETS: LazyLock<Vec<Ipv4Net>> = LazyLock::new(|| {
    RESERVED_V4
        .iter()
        .map(|cidr| cidr.parse().expect("reserved IPv4 range literal"))
        .collect()
});

static RESERVED_V6_NETS: LazyLock<Vec<Ipv6Net>> = LazyLock::new(|| {
    RESERVED_V6
        .iter()
        .map(|cidr| cidr.parse().expect("reserved IPv6 range literal"))
        .collect()
});

static NAT64_NET: LazyLock<Ipv6Net> =
    LazyLock::new(|| "64:ff9b::/96".parse().expect("NAT64 range literal"));

static LOCAL_NAT64_NET: LazyLock<Ipv6Net> =
    LazyLock::new(|| "64:ff9b:1::/48".parse().expect("local NAT64 range literal"));

static SIX_TO_FOUR_NET: LazyLock<Ipv6Net> =
    LazyLock::new(|| "2002::/16".parse().expect("6to4 range literal"));

/// Classify an IP address.
pub fn classify(ip: IpAddr) -> IpClass {
    match ip {
        IpAddr::V4(ipv4) => classify_v4(ipv4),
        IpAddr::V6(ipv6) => classify_v6(ipv6),
    }
}

fn classify_v4(ip: Ipv4Addr) -> IpClass {
    if ip.is_loopback() {
        return IpClass::Loopback;
    }

    if ip.is_link_local() {
        return IpClass::LinkLocal;
    }

    if ip.is_private() || SHARED_V4_NET.contains(&ip) {
        return IpClass::Private;
    }

    if RESERVED_V4_NETS.iter().any(|net| net.contains(&ip)) {
        return IpClass::Reserved;
    }

    IpClass::Public
}

fn classify_v6(ip: Ipv6Addr) -> IpClass {
    if ip.is_unspecified() {
        return IpClass::Reserved;
    }

    // ::1 before any embedded-IPv4 handling, it would otherwise read as ::0.0.0.1
    if ip.is_loopback() {
        return IpClass::Loopback;
    }

    if let Some(ipv4) = embedded_ipv4(ip) {
        return classify_v4(ipv4);
    }

    // Local-use NAT64 is never globally reachable, whatever it carries.
    if LOCAL_NAT64_NET.contains(&ip) {
        return match classify_v4(low_ipv4(ip)) {
            IpClass::Public => IpClass::Reserved,
            class => class,
        };
    }

    let first = ip.segments()[0];

    // fe80::/10
    if first & 0xffc0 == 0xfe80 {
        return IpClass::LinkLocal;
    }

    // fc00::/7
    if first & 0xfe00 == 0xfc00 {
        return IpClass::Private;
    }

    if RESERVED_V6_NETS.iter().any(|net| net.contains(&ip)) {
        return IpClass::Reserved;
    }

    // 2000::/3
    if first & 0xe000 != 0x2000 {
        return IpClass::Reserved;
    }

    IpClass::Public
}

/// Extract an IPv4 address carried inside an IPv6 one.
///
/// Covers IPv4-mapped (`::ffff:a.b.c.d`), IPv4-translated
/// (`::ffff:0:a.b.c.d`), the deprecated IPv4-compatible form (`::a.b.c.d`),
/// the NAT64 well-known prefix (`64:ff9b::a.b.c.d`) and 6to4
/// (`2002:aabb:ccdd::/48`).
fn embedded_ipv4(ip: Ipv6Addr) -> Option<Ipv4Addr> {
    if let Some(ipv4) = ip.to_ipv4_mapped() {
        return Some(ipv4);
    }

    let segments = ip.segments();
    let tail = low_ipv4(ip);

    if segments[..6] == [0, 0, 0, 0, 0xffff, 0] {
        return Some(tail);
    }

    if segments[..6] == [0, 0, 0, 0, 0, 0] && !tail.is_unspecified() {
        return Some(tail);
    }

    if NAT64_NET.contains(&ip) {
        return Some(tail);
    }

    if SIX_TO_FOUR_NET.contains(&ip) {
        return Some(Ipv4Addr::new(
            (segments[1] >> 8) as u8,
            segments[1] as u8,
            (segments[2] >> 8) as u8,
            segments[2] as u8,
        ));
    }

    None
}

/// The last 32 bits as an IPv4 address.
fn low_ipv4(ip: Ipv6Addr) -> Ipv4Addr {
    let octets = ip.octets();
    Ipv4Addr::new(octets[12], octets[13], octets[14], octets[15])
}
