//! Business logic services.

#![allow(missing_docs)]

pub mod album;
pub mod category;
pub mod comment;
pub mod follow;
pub mod like;
pub mod media;
pub mod photo;
pub mod seo;
pub mod user;

pub use album::{
    AlbumDetailResponse, AlbumListing, AlbumResponse, AlbumService, AlbumStats, CreateAlbumInput,
};
pub use category::{CategoryResponse, CategoryService};
pub use comment::{CommentResponse, CommentService, CreateCommentInput};
pub use follow::{FollowService, FollowToggleResponse};
pub use like::{LikeService, LikeToggleResponse};
pub use media::{MediaService, StoredImage};
pub use photo::{
    PhotoDetailResponse, PhotoListParams, PhotoResponse, PhotoService, UpdatePhotoInput,
    UploadPhotoInput,
};
pub use seo::SeoService;
pub use user::{
    CreateUserInput, ProfileResponse, UpdateProfileInput, UserResponse, UserService,
};
