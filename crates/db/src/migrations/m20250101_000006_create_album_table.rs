//! Create album table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Album::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Album::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Album::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Album::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Album::Description).text())
                    .col(ColumnDef::new(Album::CoverPhotoId).string_len(32))
                    .col(
                        ColumnDef::new(Album::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Album::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Album::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_user")
                            .from(Album::Table, Album::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_cover_photo")
                            .from(Album::Table, Album::CoverPhotoId)
                            .to(Photo::Table, Photo::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for owner listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_album_user_id")
                    .table(Album::Table)
                    .col(Album::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: (is_public, created_at)
        manager
            .create_index(
                Index::create()
                    .name("idx_album_public_created_at")
                    .table(Album::Table)
                    .col(Album::IsPublic)
                    .col(Album::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Album::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Album {
    Table,
    Id,
    UserId,
    Title,
    Description,
    CoverPhotoId,
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
enum Photo {
    Table,
    Id,
}
