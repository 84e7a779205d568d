//! # Animoshi Infrastructure
//!
//! Concrete implementations of the ports defined in `animoshi-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory store and reCAPTCHA verifier only
//! - `postgres` - PostgreSQL document collections via SeaORM
//! - `rate-limit` - Per-client token bucket via governor
//! - `s3` - Image uploads to S3

pub mod database;
pub mod memory;
pub mod verification;

#[cfg(feature = "s3")]
pub mod media;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use database::DatabaseConfig;
pub use memory::InMemoryStore;
pub use verification::{RecaptchaConfig, RecaptchaVerifier};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "s3")]
pub use media::{S3Config, S3MediaStore};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
