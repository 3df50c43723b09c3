//! Create album membership table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlbumPhoto::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlbumPhoto::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AlbumPhoto::AlbumId).string_len(32).not_null())
                    .col(ColumnDef::new(AlbumPhoto::PhotoId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(AlbumPhoto::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_photo_album")
                            .from(AlbumPhoto::Table, AlbumPhoto::AlbumId)
                            .to(Album::Table, Album::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_photo_photo")
                            .from(AlbumPhoto::Table, AlbumPhoto::PhotoId)
                            .to(Photo::Table, Photo::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (album_id, photo_id) - a photo appears once per album
        manager
            .create_index(
                Index::create()
                    .name("idx_album_photo_album_photo")
                    .table(AlbumPhoto::Table)
                    .col(AlbumPhoto::AlbumId)
                    .col(AlbumPhoto::PhotoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: photo_id (for membership lookups from the photo side)
        manager
            .create_index(
                Index::create()
                    .name("idx_album_photo_photo_id")
                    .table(AlbumPhoto::Table)
                    .col(AlbumPhoto::PhotoId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlbumPhoto::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AlbumPhoto {
    Table,
    Id,
    AlbumId,
    PhotoId,
    CreatedAt,
}

#[derive(Iden)]
enum Album {
    Table,
    Id,
}

#[derive(Iden)]
enum Photo {
    Table,
    Id,
}
