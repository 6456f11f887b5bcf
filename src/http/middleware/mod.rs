//! Request middleware.

pub mod client_ip;

pub use client_ip::{client_ip_middleware, ClientIpState};
