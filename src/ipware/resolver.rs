//! Client IP resolution over gateway-style request metadata.
//!
//! # Responsibilities
//! - Walk the precedence list and pick the best client address
//! - Interpret comma-separated chains leftmost or rightmost
//! - Validate the proxy route against an expected count and/or trusted
//!   proxy prefixes
//!
//! # Design Decisions
//! - Without proxy validation a global address wins immediately; private
//!   and loopback addresses are only fallbacks
//! - With proxy validation only a validated chain produces an address
//! - An element that fails to parse invalidates the whole header

use std::collections::HashMap;

use serde::Serialize;

use crate::ipware::address::ClientIp;
use crate::ipware::error::ConfigurationError;

/// Gateway-style request metadata: `HTTP_*` header keys plus `REMOTE_ADDR`.
pub type HeaderMeta = HashMap<String, String>;

/// Metadata key holding the connection peer address.
pub const REMOTE_ADDR: &str = "REMOTE_ADDR";

/// Outcome of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Resolution {
    /// Resolved client address, if any header produced one.
    pub ip: Option<ClientIp>,

    /// True when the address was reached through a validated proxy route.
    pub trusted_route: bool,
}

impl Resolution {
    pub fn trusted(ip: ClientIp) -> Self {
        Self { ip: Some(ip), trusted_route: true }
    }

    pub fn untrusted(ip: ClientIp) -> Self {
        Self { ip: Some(ip), trusted_route: false }
    }

    /// No address could be determined.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn into_parts(self) -> (Option<ClientIp>, bool) {
        (self.ip, self.trusted_route)
    }
}

/// Parameters handed to a resolver at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverParams {
    /// Gateway-style header keys, most trusted first.
    pub precedence: Vec<String>,
    pub leftmost: bool,
    pub proxy_count: Option<i64>,
    pub proxy_list: Vec<String>,
}

/// A client IP resolution engine.
pub trait ClientIpResolver: Sized {
    /// Build the engine, rejecting invalid parameters.
    fn from_params(params: ResolverParams) -> Result<Self, ConfigurationError>;

    /// Resolve the client address from gateway-style metadata.
    fn lookup(&self, meta: &HeaderMeta, strict: bool) -> Resolution;
}

/// Default resolution engine.
#[derive(Debug, Clone)]
pub struct IpWare {
    precedence: Vec<String>,
    leftmost: bool,
    proxy_count: Option<usize>,
    proxy_list: Vec<String>,
}

impl IpWare {
    pub fn precedence(&self) -> &[String] {
        &self.precedence
    }

    pub fn leftmost(&self) -> bool {
        self.leftmost
    }

    pub fn proxy_count(&self) -> Option<usize> {
        self.proxy_count
    }

    pub fn proxy_list(&self) -> &[String] {
        &self.proxy_list
    }

    fn validates_proxies(&self) -> bool {
        self.proxy_count.is_some() || !self.proxy_list.is_empty()
    }

    /// Parse a header value into a chain ordered client first.
    fn parse_chain(&self, value: &str) -> Option<Vec<ClientIp>> {
        let mut chain = value
            .split(',')
            .map(ClientIp::parse_header_element)
            .collect::<Option<Vec<_>>>()?;
        if !self.leftmost {
            chain.reverse();
        }
        Some(chain)
    }

    fn is_proxy_count_valid(&self, chain: &[ClientIp], strict: bool) -> bool {
        let Some(expected) = self.proxy_count else {
            return true;
        };
        let hops = chain.len() - 1;
        if strict {
            hops == expected
        } else {
            hops >= expected
        }
    }

    fn is_proxy_list_valid(&self, chain: &[ClientIp], strict: bool) -> bool {
        if self.proxy_list.is_empty() {
            return true;
        }
        let hops = chain.len() - 1;
        let expected = self.proxy_list.len();
        if (strict && hops != expected) || hops < expected {
            return false;
        }
        chain[chain.len() - expected..]
            .iter()
            .zip(&self.proxy_list)
            .all(|(proxy, prefix)| proxy.to_string().starts_with(prefix.as_str()))
    }
}

impl ClientIpResolver for IpWare {
    fn from_params(params: ResolverParams) -> Result<Self, ConfigurationError> {
        if params.precedence.is_empty() {
            return Err(ConfigurationError::EmptyPrecedence);
        }
        for (i, key) in params.precedence.iter().enumerate() {
            if params.precedence[..i]
                .iter()
                .any(|seen| seen.eq_ignore_ascii_case(key))
            {
                return Err(ConfigurationError::DuplicateHeader(key.clone()));
            }
        }

        let proxy_count = params
            .proxy_count
            .map(|count| usize::try_from(count).map_err(|_| ConfigurationError::NegativeProxyCount(count)))
            .transpose()?;

        let proxy_list = params
            .proxy_list
            .into_iter()
            .map(|prefix| {
                let prefix = prefix.trim().to_ascii_lowercase();
                let valid = !prefix.is_empty()
                    && prefix.chars().all(|c| c.is_ascii_hexdigit() || c == '.' || c == ':');
                if valid {
                    Ok(prefix)
                } else {
                    Err(ConfigurationError::InvalidProxyPrefix(prefix))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            precedence: params.precedence,
            leftmost: params.leftmost,
            proxy_count,
            proxy_list,
        })
    }

    fn lookup(&self, meta: &HeaderMeta, strict: bool) -> Resolution {
        let mut private = None;
        let mut loopback = None;

        let remote_addr = if self.validates_proxies() { None } else { Some(REMOTE_ADDR) };
        let keys = self.precedence.iter().map(String::as_str).chain(remote_addr);

        for key in keys {
            let Some(value) = meta_value(meta, key) else {
                continue;
            };
            let Some(chain) = self.parse_chain(value) else {
                tracing::trace!(header = %key, value = %value, "Skipping unparseable header");
                continue;
            };
            let client = chain[0];

            if self.validates_proxies() {
                if self.is_proxy_count_valid(&chain, strict) && self.is_proxy_list_valid(&chain, strict) {
                    tracing::debug!(header = %key, client = %client, "Resolved client through trusted route");
                    return Resolution::trusted(client);
                }
                tracing::trace!(header = %key, hops = chain.len() - 1, strict, "Proxy route rejected");
                continue;
            }

            if client.is_global() {
                tracing::debug!(header = %key, client = %client, "Resolved global client address");
                return Resolution::untrusted(client);
            }
            if client.is_loopback() {
                loopback.get_or_insert(client);
            } else {
                private.get_or_insert(client);
            }
        }

        match private.or(loopback) {
            Some(client) => {
                tracing::debug!(client = %client, "Resolved non-global client address");
                Resolution::untrusted(client)
            }
            None => Resolution::none(),
        }
    }
}

/// Look a key up as given, then with hyphens in place of underscores.
fn meta_value<'a>(meta: &'a HeaderMeta, key: &str) -> Option<&'a str> {
    let value = match meta.get(key) {
        Some(value) => value,
        None => meta.get(&key.replace('_', "-"))?,
    };
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
