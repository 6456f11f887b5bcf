//! Client IP resolution from natural HTTP header names.
//!
//! [`HeaderIpWare`] accepts header names as they appear on the wire
//! (`X-Forwarded-For`), translates them into gateway-style metadata keys
//! (`HTTP_X_FORWARDED_FOR`) and delegates to a [`ClientIpResolver`].

pub mod config;
pub mod http;
pub mod ipware;
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use ipware::{ClientIp, ClientIpResolver, ConfigurationError, HeaderIpWare, IpWareOptions, Resolution};
pub use lifecycle::Shutdown;
