//! Client address parsing and classification.
//!
//! # Responsibilities
//! - Parse one address as it appears in a proxy header, with or without a
//!   port, bracketed IPv6, or an RFC 7239 `for=` parameter
//! - Classify addresses as global, private, loopback or multicast
//!
//! # Design Decisions
//! - IPv4-mapped IPv6 addresses are unwrapped to IPv4
//! - "Private" means any IANA special-purpose range that is not globally
//!   reachable, not only RFC 1918

use serde::{Serialize, Serializer};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// A resolved client address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientIp(IpAddr);

impl ClientIp {
    pub fn new(ip: IpAddr) -> Self {
        Self(normalize(ip))
    }

    /// The underlying address.
    pub fn ip(&self) -> IpAddr {
        self.0
    }

    pub fn is_ipv4(&self) -> bool {
        self.0.is_ipv4()
    }

    pub fn is_ipv6(&self) -> bool {
        self.0.is_ipv6()
    }

    pub fn is_loopback(&self) -> bool {
        self.0.is_loopback()
    }

    pub fn is_multicast(&self) -> bool {
        self.0.is_multicast()
    }

    /// True when the address belongs to a special-purpose range that is not
    /// globally reachable.
    pub fn is_private(&self) -> bool {
        match self.0 {
            IpAddr::V4(v4) => is_private_v4(v4),
            IpAddr::V6(v6) => is_private_v6(v6),
        }
    }

    /// True for publicly routable unicast addresses.
    pub fn is_global(&self) -> bool {
        if self.is_private() || self.is_multicast() || self.0.is_unspecified() {
            return false;
        }
        match self.0 {
            IpAddr::V4(v4) => !is_shared_v4(v4),
            IpAddr::V6(_) => true,
        }
    }

    /// Parse one element of a proxy header value.
    ///
    /// Accepts `1.2.3.4`, `1.2.3.4:8080`, `2001:db8::1`, `[2001:db8::1]:8080`
    /// and RFC 7239 elements such as `for="[2001:db8::1]:80";proto=https`.
    pub fn parse_header_element(element: &str) -> Option<Self> {
        let element = element.trim();
        if element.contains('=') {
            return forwarded_for(element).and_then(parse_host);
        }
        parse_host(element)
    }
}

impl From<IpAddr> for ClientIp {
    fn from(ip: IpAddr) -> Self {
        Self::new(ip)
    }
}

impl From<ClientIp> for IpAddr {
    fn from(ip: ClientIp) -> Self {
        ip.0
    }
}

impl FromStr for ClientIp {
    type Err = std::net::AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<IpAddr>().map(Self::new)
    }
}

impl fmt::Display for ClientIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for ClientIp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn normalize(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}

/// Extract the `for=` value of an RFC 7239 element.
fn forwarded_for(element: &str) -> Option<&str> {
    element.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("for") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

fn parse_host(host: &str) -> Option<ClientIp> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Some(ClientIp::new(ip));
    }
    // [v6] or [v6]:port
    if let Some(rest) = host.strip_prefix('[') {
        let (inner, tail) = rest.split_once(']')?;
        if !tail.is_empty() && !is_port_suffix(tail) {
            return None;
        }
        return inner.parse::<Ipv6Addr>().ok().map(|v6| ClientIp::new(IpAddr::V6(v6)));
    }
    // v4:port
    let (addr, port) = host.rsplit_once(':')?;
    port.parse::<u16>().ok()?;
    addr.parse::<Ipv4Addr>().ok().map(|v4| ClientIp::new(IpAddr::V4(v4)))
}

fn is_port_suffix(tail: &str) -> bool {
    tail.strip_prefix(':')
        .is_some_and(|port| port.parse::<u16>().is_ok())
}

fn is_shared_v4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    a == 100 && (b & 0b1100_0000) == 0b0100_0000
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    let [a, b, c, d] = ip.octets();
    a == 0
        || ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_documentation()
        || ip.is_broadcast()
        // 192.0.0.0/29 and 192.0.0.170/31
        || (a == 192 && b == 0 && c == 0 && (d < 8 || d == 170 || d == 171))
        // benchmarking, 198.18.0.0/15
        || (a == 198 && (b & 0xfe) == 18)
        // reserved, 240.0.0.0/4
        || a >= 240
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    let seg = ip.segments();
    ip.is_loopback()
        || ip.is_unspecified()
        || ip.to_ipv4_mapped().is_some()
        // discard-only, 100::/64
        || (seg[0] == 0x0100 && seg[1] == 0 && seg[2] == 0 && seg[3] == 0)
        // IETF protocol assignments, 2001::/23
        || (seg[0] == 0x2001 && seg[1] < 0x0200)
        // documentation, 2001:db8::/32
        || (seg[0] == 0x2001 && seg[1] == 0x0db8)
        // unique local, fc00::/7
        || (seg[0] & 0xfe00) == 0xfc00
        // link local, fe80::/10
        || (seg[0] & 0xffc0) == 0xfe80
}
