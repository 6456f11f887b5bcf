//! Natural-header front end for a client IP resolver.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::ipware::error::ConfigurationError;
use crate::ipware::naming::{to_legacy_meta, to_legacy_names};
use crate::ipware::resolver::{ClientIpResolver, IpWare, Resolution, ResolverParams, REMOTE_ADDR};
use crate::ipware::source::HeaderSource;

/// Headers consulted when no precedence is configured, most trusted first.
pub const DEFAULT_PRECEDENCE: [&str; 10] = [
    "CF-Connecting-IP",    // Cloudflare
    "True-Client-IP",      // Cloudflare Enterprise, Akamai
    "Fastly-Client-IP",    // Fastly, Firebase
    "X-Forwarded-For",     // AWS ELB, nginx, most proxies
    "X-Real-IP",           // nginx
    "X-Client-IP",         // Azure
    "X-Cluster-Client-IP", // Rackspace load balancers
    "Forwarded-For",
    "Forwarded", // RFC 7239
    "Client-IP",
];

/// Construction parameters, in natural header naming.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IpWareOptions {
    /// Headers to consult in order. `None` selects [`DEFAULT_PRECEDENCE`].
    pub precedence: Option<Vec<String>>,

    /// Take the leftmost address of a comma-separated chain as the client.
    pub leftmost: bool,

    /// Expected number of proxies between client and server.
    pub proxy_count: Option<i64>,

    /// Trusted proxy address prefixes, from the client outward
    /// (e.g. `["10.1.", "10.2."]`).
    pub proxy_list: Option<Vec<String>>,
}

impl Default for IpWareOptions {
    fn default() -> Self {
        Self {
            precedence: None,
            leftmost: true,
            proxy_count: None,
            proxy_list: None,
        }
    }
}

impl IpWareOptions {
    pub fn with_precedence<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.precedence = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_leftmost(mut self, leftmost: bool) -> Self {
        self.leftmost = leftmost;
        self
    }

    pub fn with_proxy_count(mut self, count: i64) -> Self {
        self.proxy_count = Some(count);
        self
    }

    pub fn with_proxy_list<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proxy_list = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }
}

/// Resolves client addresses from requests carrying natural header names.
///
/// The precedence list is translated to gateway-style keys once, at
/// construction. Each lookup translates the request's headers the same way
/// and hands them to the resolver, whose answer is returned unchanged.
///
/// ```
/// use header_ipware::ipware::{HeaderIpWare, IpWareOptions};
///
/// let ipware = HeaderIpWare::new(
///     IpWareOptions::default().with_precedence(["CF-Connecting-IP", "X-Forwarded-For"]),
/// )
/// .unwrap();
///
/// let headers = vec![("CF-Connecting-IP", "198.51.100.42")];
/// let (ip, trusted) = ipware.get_client_ip_from_request(&headers, false).into_parts();
/// assert_eq!(ip.unwrap().to_string(), "198.51.100.42");
/// assert!(!trusted);
/// ```
#[derive(Debug, Clone)]
pub struct HeaderIpWare<R = IpWare> {
    precedence: Vec<String>,
    legacy_precedence: Vec<String>,
    resolver: R,
}

impl HeaderIpWare {
    /// Build an adapter over the default [`IpWare`] engine.
    pub fn new(options: IpWareOptions) -> Result<Self, ConfigurationError> {
        Self::with_resolver(options)
    }
}

impl<R: ClientIpResolver> HeaderIpWare<R> {
    /// Build an adapter over any resolver.
    pub fn with_resolver(options: IpWareOptions) -> Result<Self, ConfigurationError> {
        let precedence = options
            .precedence
            .unwrap_or_else(|| DEFAULT_PRECEDENCE.iter().map(|h| h.to_string()).collect());
        let legacy_precedence = to_legacy_names(&precedence);

        let resolver = R::from_params(ResolverParams {
            precedence: legacy_precedence.clone(),
            leftmost: options.leftmost,
            proxy_count: options.proxy_count,
            proxy_list: options.proxy_list.unwrap_or_default(),
        })?;

        tracing::debug!(
            precedence = ?legacy_precedence,
            leftmost = options.leftmost,
            proxy_count = ?options.proxy_count,
            "Client IP resolver configured"
        );

        Ok(Self {
            precedence,
            legacy_precedence,
            resolver,
        })
    }

    /// Resolve the client address of a request.
    ///
    /// With `strict`, the proxy route must match the configured count and
    /// list exactly; otherwise extra proxies are allowed.
    pub fn get_client_ip_from_request<S>(&self, request: &S, strict: bool) -> Resolution
    where
        S: HeaderSource + ?Sized,
    {
        let meta = to_legacy_meta(request);
        self.resolver.lookup(&meta, strict)
    }

    /// Like [`get_client_ip_from_request`](Self::get_client_ip_from_request),
    /// also offering the connection peer as a last-resort address.
    pub fn get_client_ip_from_parts<S>(
        &self,
        headers: &S,
        peer: Option<SocketAddr>,
        strict: bool,
    ) -> Resolution
    where
        S: HeaderSource + ?Sized,
    {
        let mut meta = to_legacy_meta(headers);
        if let Some(peer) = peer {
            meta.insert(REMOTE_ADDR.to_string(), peer.ip().to_string());
        }
        self.resolver.lookup(&meta, strict)
    }

    /// Configured precedence, in natural naming.
    pub fn precedence(&self) -> &[String] {
        &self.precedence
    }

    /// Configured precedence, as handed to the resolver.
    pub fn legacy_precedence(&self) -> &[String] {
        &self.legacy_precedence
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}
