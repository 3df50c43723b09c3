//! Create photo table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Photo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Photo::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Photo::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Photo::CategoryId).string_len(32))
                    .col(ColumnDef::new(Photo::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Photo::Description).text())
                    .col(ColumnDef::new(Photo::ImageKey).string_len(512).not_null())
                    .col(ColumnDef::new(Photo::ImageUrl).string_len(1024).not_null())
                    .col(
                        ColumnDef::new(Photo::Tags)
                            .string_len(500)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Photo::Location).string_len(200))
                    .col(ColumnDef::new(Photo::CameraSettings).string_len(200))
                    .col(
                        ColumnDef::new(Photo::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Photo::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Photo::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Photo::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Photo::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_user")
                            .from(Photo::Table, Photo::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_category")
                            .from(Photo::Table, Photo::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for profile listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_photo_user_id")
                    .table(Photo::Table)
                    .col(Photo::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: category_id (for category listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_photo_category_id")
                    .table(Photo::Table)
                    .col(Photo::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Index: (is_public, created_at) - the public listing's base predicate
        manager
            .create_index(
                Index::create()
                    .name("idx_photo_public_created_at")
                    .table(Photo::Table)
                    .col(Photo::IsPublic)
                    .col(Photo::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photo::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Photo {
    Table,
    Id,
    UserId,
    CategoryId,
    Title,
    Description,
    ImageKey,
    ImageUrl,
    Tags,
    Location,
    CameraSettings,
    LikeCount,
    ViewCount,
    IsPublic,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}
