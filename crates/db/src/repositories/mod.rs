//! Repository layer over the entities.

pub mod album;
pub mod category;
pub mod comment;
pub mod follow;
pub mod photo;
pub mod user;

pub use album::{AlbumRepository, AlbumSort};
pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use photo::{PhotoQuery, PhotoRepository, PhotoSort};
pub use user::UserRepository;
