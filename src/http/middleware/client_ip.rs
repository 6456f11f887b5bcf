//! Client IP middleware.
//! Resolves the caller's address once and attaches it to the request.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::http::request::RequestIdExt;
use crate::ipware::HeaderIpWare;

/// State required for client IP resolution.
#[derive(Clone)]
pub struct ClientIpState {
    pub ipware: Arc<HeaderIpWare>,
    pub strict: bool,
}

/// Insert a [`Resolution`](crate::ipware::Resolution) into the request
/// extensions. The connection peer, when known, is the last-resort address.
pub async fn client_ip_middleware(
    State(state): State<ClientIpState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let resolution = state
        .ipware
        .get_client_ip_from_parts(req.headers(), peer, state.strict);

    tracing::debug!(
        request_id = %req.request_id(),
        client_ip = ?resolution.ip.map(|ip| ip.to_string()),
        trusted_route = resolution.trusted_route,
        "Client IP resolved"
    );

    req.extensions_mut().insert(resolution);
    next.run(req).await
}
