//! # Animoshi Core
//!
//! The domain layer of the Animoshi API.
//! Entities, the ports infrastructure must implement, input validation and
//! the interaction services that gate every post, comment and like.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::{InteractionError, RepoError};
pub use services::InteractionService;
