use axum::{response::IntoResponse, Extension, Json};
use serde::Serialize;

use crate::ipware::{ClientIp, Resolution};

#[derive(Debug, Serialize)]
pub struct IpType {
    pub is_global: bool,
    pub is_private: bool,
    pub is_loopback: bool,
    pub is_multicast: bool,
}

#[derive(Debug, Serialize)]
pub struct ClientIpResponse {
    pub ip: ClientIp,
    pub trusted_route: bool,
    pub ip_type: IpType,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub async fn get_client_ip(Extension(resolution): Extension<Resolution>) -> impl IntoResponse {
    match resolution.ip {
        Some(ip) => Json(ClientIpResponse {
            ip,
            trusted_route: resolution.trusted_route,
            ip_type: IpType {
                is_global: ip.is_global(),
                is_private: ip.is_private(),
                is_loopback: ip.is_loopback(),
                is_multicast: ip.is_multicast(),
            },
        })
        .into_response(),
        None => Json(ErrorResponse {
            error: "Could not determine IP address",
        })
        .into_response(),
    }
}

pub async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}
