//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout, tracing)
//!     → request.rs (assign/propagate x-request-id)
//!     → middleware/client_ip.rs (resolve client, attach Resolution)
//!     → handlers.rs (JSON response)
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
