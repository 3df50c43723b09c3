//! Photo entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Photo entity - an uploaded image with its metadata.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning user ID.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Optional category. Cleared (not cascaded) when the category is
    /// deleted.
    #[sea_orm(indexed, nullable)]
    pub category_id: Option<String>,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Storage key of the image file.
    pub image_key: String,

    /// Public URL of the image file.
    pub image_url: String,

    /// Comma-separated tags.
    #[sea_orm(default_value = "")]
    pub tags: String,

    #[sea_orm(nullable)]
    pub location: Option<String>,

    /// Camera, lens, settings.
    #[sea_orm(nullable)]
    pub camera_settings: Option<String>,

    /// Number of likes (denormalized mirror of the like edge set).
    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    /// View counter. Monotonically non-decreasing.
    #[sea_orm(default_value = 0)]
    pub view_count: i32,

    /// Whether the photo is publicly listable.
    #[sea_orm(default_value = true)]
    pub is_public: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Split the comma-separated tag string into trimmed, non-empty tags.
    #[must_use]
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::photo_like::Entity")]
    Likes,

    #[sea_orm(has_many = "super::album_photo::Entity")]
    AlbumPhotos,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::photo_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl Related<super::album_photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlbumPhotos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
