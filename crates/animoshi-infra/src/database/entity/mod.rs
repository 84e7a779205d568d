//! SeaORM entities, one per document collection.

pub mod comment;
pub mod like;
pub mod post;
pub mod waifu;
