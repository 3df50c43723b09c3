//! Album entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Album entity - a user-curated collection of photos.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "album")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning user ID.
    #[sea_orm(indexed)]
    pub user_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Optional cover photo. Cleared (not cascaded) when that photo is
    /// deleted.
    #[sea_orm(nullable)]
    pub cover_photo_id: Option<String>,

    /// Whether the album is publicly listable.
    #[sea_orm(default_value = true)]
    pub is_public: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
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
        belongs_to = "super::photo::Entity",
        from = "Column::CoverPhotoId",
        to = "super::photo::Column::Id",
        on_delete = "SetNull"
    )]
    CoverPhoto,

    #[sea_orm(has_many = "super::album_photo::Entity")]
    Memberships,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::album_photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
