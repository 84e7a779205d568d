//! Middleware modules.

pub mod client_ip;
pub mod cors;
pub mod error;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;
