//! Database entities.

pub mod album;
pub mod album_photo;
pub mod category;
pub mod comment;
pub mod follow;
pub mod photo;
pub mod photo_like;
pub mod user;

pub use album::Entity as Album;
pub use album_photo::Entity as AlbumPhoto;
pub use category::Entity as Category;
pub use comment::Entity as Comment;
pub use follow::Entity as Follow;
pub use photo::Entity as Photo;
pub use photo_like::Entity as PhotoLike;
pub use user::Entity as User;
