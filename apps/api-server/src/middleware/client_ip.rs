//! Client IP extractor.
//!
//! Used as the rate-limit key and as the stored submitting IP of comments and
//! likes. With [`ForwardedHeaders`] trusted (the default), the first hop of
//! `Forwarded` / `X-Forwarded-For` wins over the peer address. Those headers
//! are client-controlled: trust them only behind a proxy that overwrites them,
//! otherwise a client can pick its own rate-limit bucket and like identity.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use std::future::{Ready, ready};

const UNKNOWN: &str = "unknown";

/// Whether forwarding headers are believed. Registered as app data; absent means trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardedHeaders {
    pub trusted: bool,
}

impl ForwardedHeaders {
    /// `TRUST_FORWARDED_HEADERS` (default `true`).
    pub fn from_env() -> Self {
        Self {
            trusted: std::env::var("TRUST_FORWARDED_HEADERS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn from_request_head(req: &HttpRequest) -> Self {
        let trusted = req
            .app_data::<ForwardedHeaders>()
            .is_none_or(|policy| policy.trusted);

        let ip = if trusted {
            req.connection_info()
                .realip_remote_addr()
                .map(|addr| strip_port(addr).to_string())
        } else {
            req.peer_addr().map(|addr| addr.ip().to_string())
        };

        ClientIp(ip.unwrap_or_else(|| UNKNOWN.to_string()))
    }
}

/// `1.2.3.4:5678` -> `1.2.3.4`, `[::1]:80` -> `::1`. Bare addresses pass through.
fn strip_port(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match addr.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            host
        }
        _ => addr,
    }
}

impl FromRequest for ClientIp {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_request_head(req)))
    }
}
