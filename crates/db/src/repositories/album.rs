//! Album repository.

use std::sync::Arc;

use crate::entities::{album, album_photo, photo, Album, AlbumPhoto, Photo};
use photoshare_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};

/// Sort keys for album listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlbumSort {
    /// Creation time descending.
    #[default]
    Newest,
    /// Creation time ascending.
    Oldest,
    /// Photo count descending, then creation time descending.
    MostPhotos,
}

impl AlbumSort {
    /// Parse the client-supplied `sort` query parameter. Unknown values
    /// fall back to newest. Both `popular` and `photos` order by photo
    /// count.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("oldest") => Self::Oldest,
            Some("popular" | "photos") => Self::MostPhotos,
            _ => Self::Newest,
        }
    }
}

/// Album repository for database operations.
#[derive(Clone)]
pub struct AlbumRepository {
    db: Arc<DatabaseConnection>,
}

impl AlbumRepository {
    /// Create a new album repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an album by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<album::Model>> {
        Album::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an album by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<album::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Album: {id}")))
    }

    /// Create an album together with its photo memberships.
    pub async fn create(
        &self,
        model: album::ActiveModel,
        memberships: Vec<album_photo::ActiveModel>,
    ) -> AppResult<album::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let album = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for membership in memberships {
            membership
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(album)
    }

    /// Count public albums.
    pub async fn count_public(&self) -> AppResult<u64> {
        Album::find()
            .filter(album::Column::IsPublic.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch a window of public albums with the given sort.
    pub async fn find_public(
        &self,
        sort: AlbumSort,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<album::Model>> {
        let query = Album::find().filter(album::Column::IsPublic.eq(true));

        let query = match sort {
            AlbumSort::Newest => query.order_by_desc(album::Column::CreatedAt),
            AlbumSort::Oldest => query.order_by_asc(album::Column::CreatedAt),
            AlbumSort::MostPhotos => query
                .left_join(album_photo::Entity)
                .group_by(album::Column::Id)
                .order_by_desc(
                    Expr::col((album_photo::Entity, album_photo::Column::Id)).count(),
                )
                .order_by_desc(album::Column::CreatedAt),
        };

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Public photos contained in an album, newest membership first.
    pub async fn find_photos(&self, album_id: &str) -> AppResult<Vec<photo::Model>> {
        Photo::find()
            .inner_join(album_photo::Entity)
            .filter(album_photo::Column::AlbumId.eq(album_id))
            .filter(photo::Column::IsPublic.eq(true))
            .order_by_desc(photo::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count photos in an album.
    pub async fn count_photos(&self, album_id: &str) -> AppResult<u64> {
        AlbumPhoto::find()
            .filter(album_photo::Column::AlbumId.eq(album_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an album.
    pub async fn update(&self, model: album::ActiveModel) -> AppResult<album::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an album. Memberships cascade; photos themselves survive.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Album::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_album(id: &str, user_id: &str) -> album::Model {
        album::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Trip".to_string(),
            description: None,
            cover_photo_id: None,
            is_public: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_sort_param_parsing() {
        assert_eq!(AlbumSort::from_param(None), AlbumSort::Newest);
        assert_eq!(AlbumSort::from_param(Some("oldest")), AlbumSort::Oldest);
        assert_eq!(AlbumSort::from_param(Some("popular")), AlbumSort::MostPhotos);
        assert_eq!(AlbumSort::from_param(Some("photos")), AlbumSort::MostPhotos);
        assert_eq!(AlbumSort::from_param(Some("bogus")), AlbumSort::Newest);
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let album = create_test_album("a1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[album]])
                .into_connection(),
        );

        let repo = AlbumRepository::new(db);
        let result = repo.find_by_id("a1").await.unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<album::Model>::new()])
                .into_connection(),
        );

        let repo = AlbumRepository::new(db);
        let err = repo.get_by_id("missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
