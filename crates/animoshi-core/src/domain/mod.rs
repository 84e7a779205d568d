//! Domain entities - the core business objects.

mod comment;
mod like;
mod post;
mod waifu;

pub use comment::Comment;
pub use like::{ANONYMOUS_USER, Like, LikeIdentity};
pub use post::{Post, PostCounter};
pub use waifu::{Waifu, WaifuStatus};
