//! Client IP resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Construction:
//!     IpWareOptions (natural header names)
//!     → naming.rs (translate precedence once: X-Real-IP → HTTP_X_REAL_IP)
//!     → resolver.rs (ClientIpResolver::from_params, may reject params)
//!     → HeaderIpWare (immutable, shared via Arc)
//!
//! Per request:
//!     request headers (source.rs: HeaderSource)
//!     → naming.rs (fresh HeaderMeta with gateway-style keys)
//!     → resolver.rs (lookup: precedence, chain order, proxy validation)
//!     → Resolution { ip, trusted_route }
//! ```
//!
//! # Design Decisions
//! - The adapter composes a resolver through a narrow trait; it never
//!   inspects or alters the resolver's answer
//! - Both sides of a lookup use the same name transform
//! - No per-request state survives a lookup

pub mod adapter;
pub mod address;
pub mod error;
pub mod naming;
pub mod resolver;
pub mod source;

pub use adapter::{HeaderIpWare, IpWareOptions, DEFAULT_PRECEDENCE};
pub use address::ClientIp;
pub use error::ConfigurationError;
pub use resolver::{ClientIpResolver, HeaderMeta, IpWare, Resolution, ResolverParams, REMOTE_ADDR};
pub use source::HeaderSource;
