//! Database migrations.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_category_table;
mod m20250101_000003_create_photo_table;
mod m20250101_000004_create_follow_table;
mod m20250101_000005_create_photo_like_table;
mod m20250101_000006_create_album_table;
mod m20250101_000007_create_album_photo_table;
mod m20250101_000008_create_comment_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_category_table::Migration),
            Box::new(m20250101_000003_create_photo_table::Migration),
            Box::new(m20250101_000004_create_follow_table::Migration),
            Box::new(m20250101_000005_create_photo_like_table::Migration),
            Box::new(m20250101_000006_create_album_table::Migration),
            Box::new(m20250101_000007_create_album_photo_table::Migration),
            Box::new(m20250101_000008_create_comment_table::Migration),
        ]
    }
}
