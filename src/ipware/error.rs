//! Errors raised while building a resolver.

use thiserror::Error;

/// Rejected resolver parameters.
///
/// Raised by [`ClientIpResolver::from_params`](super::ClientIpResolver::from_params)
/// and propagated unchanged by [`HeaderIpWare`](super::HeaderIpWare).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The precedence list has no entries.
    #[error("header precedence must contain at least one header")]
    EmptyPrecedence,

    /// Two precedence entries name the same header.
    #[error("header {0:?} appears more than once in the precedence list")]
    DuplicateHeader(String),

    /// The expected proxy count is below zero.
    #[error("proxy count must be non-negative, got {0}")]
    NegativeProxyCount(i64),

    /// A trusted proxy prefix is empty or not part of an IP address.
    #[error("invalid trusted proxy prefix {0:?}")]
    InvalidProxyPrefix(String),
}
