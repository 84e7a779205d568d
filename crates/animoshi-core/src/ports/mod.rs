//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod media;
mod rate_limit;
mod repository;
mod verification;

pub use media::{MediaError, MediaStore, Upload};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{
    BaseRepository, CommentRepository, LikeRepository, PostRepository, WaifuRepository,
};
pub use verification::{ChallengeScore, HumanVerifier, VerifierError};
