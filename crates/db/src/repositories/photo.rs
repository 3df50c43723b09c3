//! Photo repository.

use std::sync::Arc;

use crate::entities::{photo, photo_like, user, Photo, PhotoLike};
use photoshare_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
    sea_query::{Expr, extension::postgres::PgExpr},
};

/// Sort keys for photo listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoSort {
    /// Creation time descending.
    #[default]
    Newest,
    /// Creation time ascending.
    Oldest,
    /// View count descending, then creation time descending.
    Popular,
    /// Like count descending, then creation time descending.
    MostLiked,
}

impl PhotoSort {
    /// Parse the client-supplied `sort` query parameter. Unknown values
    /// fall back to newest.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("oldest") => Self::Oldest,
            Some("popular") => Self::Popular,
            Some("liked") => Self::MostLiked,
            _ => Self::Newest,
        }
    }
}

/// Filter set for photo listings.
#[derive(Debug, Clone, Default)]
pub struct PhotoQuery {
    /// Restrict to publicly visible photos.
    pub only_public: bool,
    /// Restrict to a single owner.
    pub owner_id: Option<String>,
    /// Restrict to a category.
    pub category_id: Option<String>,
    /// Case-insensitive free-text term over title, description, tags, and
    /// owner username.
    pub search: Option<String>,
    /// Additionally match the free-text term against location (used by the
    /// search page).
    pub search_location: bool,
    /// Sort key.
    pub sort: PhotoSort,
}

impl PhotoQuery {
    /// Query over all public photos.
    #[must_use]
    pub fn public() -> Self {
        Self {
            only_public: true,
            ..Self::default()
        }
    }

    fn apply(&self, mut query: Select<Photo>) -> Select<Photo> {
        if self.only_public {
            query = query.filter(photo::Column::IsPublic.eq(true));
        }
        if let Some(ref owner_id) = self.owner_id {
            query = query.filter(photo::Column::UserId.eq(owner_id.as_str()));
        }
        if let Some(ref category_id) = self.category_id {
            query = query.filter(photo::Column::CategoryId.eq(category_id.as_str()));
        }
        if let Some(ref term) = self.search {
            let pattern = format!("%{}%", escape_like(term));
            let mut cond = Condition::any()
                .add(Expr::col((photo::Entity, photo::Column::Title)).ilike(pattern.clone()))
                .add(
                    Expr::col((photo::Entity, photo::Column::Description)).ilike(pattern.clone()),
                )
                .add(Expr::col((photo::Entity, photo::Column::Tags)).ilike(pattern.clone()))
                .add(Expr::col((user::Entity, user::Column::Username)).ilike(pattern.clone()));
            if self.search_location {
                cond =
                    cond.add(Expr::col((photo::Entity, photo::Column::Location)).ilike(pattern));
            }
            query = query.inner_join(user::Entity).filter(cond);
        }

        match self.sort {
            PhotoSort::Newest => query.order_by_desc(photo::Column::CreatedAt),
            PhotoSort::Oldest => query.order_by_asc(photo::Column::CreatedAt),
            PhotoSort::Popular => query
                .order_by_desc(photo::Column::ViewCount)
                .order_by_desc(photo::Column::CreatedAt),
            PhotoSort::MostLiked => query
                .order_by_desc(photo::Column::LikeCount)
                .order_by_desc(photo::Column::CreatedAt),
        }
    }
}

/// Escape `%` and `_` in a LIKE pattern.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Photo repository for database operations.
#[derive(Clone)]
pub struct PhotoRepository {
    db: Arc<DatabaseConnection>,
}

impl PhotoRepository {
    /// Create a new photo repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a photo by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<photo::Model>> {
        Photo::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a photo by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<photo::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PhotoNotFound(id.to_string()))
    }

    /// Count photos matching a filter set.
    pub async fn count_filtered(&self, query: &PhotoQuery) -> AppResult<u64> {
        query
            .apply(Photo::find())
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch a window of photos matching a filter set.
    pub async fn find_filtered(
        &self,
        query: &PhotoQuery,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<photo::Model>> {
        query
            .apply(Photo::find())
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Public photos related to the given one: same category or same owner,
    /// excluding the photo itself.
    pub async fn find_related(
        &self,
        photo: &photo::Model,
        limit: u64,
    ) -> AppResult<Vec<photo::Model>> {
        let mut cond = Condition::any().add(photo::Column::UserId.eq(photo.user_id.as_str()));
        if let Some(ref category_id) = photo.category_id {
            cond = cond.add(photo::Column::CategoryId.eq(category_id.as_str()));
        }

        Photo::find()
            .filter(photo::Column::IsPublic.eq(true))
            .filter(photo::Column::Id.ne(photo.id.as_str()))
            .filter(cond)
            .order_by_desc(photo::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new photo.
    pub async fn create(&self, model: photo::ActiveModel) -> AppResult<photo::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a photo.
    pub async fn update(&self, model: photo::ActiveModel) -> AppResult<photo::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a photo.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Photo::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Atomically increment the stored view counter by one.
    ///
    /// Runs as a single `UPDATE ... SET view_count = view_count + 1` so
    /// concurrent reads never lose increments.
    pub async fn increment_view_count(&self, id: &str) -> AppResult<()> {
        Photo::update_many()
            .col_expr(
                photo::Column::ViewCount,
                Expr::col(photo::Column::ViewCount).add(1),
            )
            .filter(photo::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count public photos.
    pub async fn count_public(&self) -> AppResult<u64> {
        self.count_filtered(&PhotoQuery::public()).await
    }

    /// Sum of view counts over a user's photos.
    pub async fn total_views_for_user(&self, user_id: &str) -> AppResult<i64> {
        #[derive(Debug, sea_orm::FromQueryResult)]
        struct ViewSum {
            total: Option<i64>,
        }

        let sum = Photo::find()
            .select_only()
            .column_as(photo::Column::ViewCount.sum(), "total")
            .filter(photo::Column::UserId.eq(user_id))
            .into_model::<ViewSum>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(sum.and_then(|s| s.total).unwrap_or(0))
    }

    // ==================== Like Operations ====================

    /// Check if a user has liked a photo.
    pub async fn has_liked(&self, photo_id: &str, user_id: &str) -> AppResult<bool> {
        let count = PhotoLike::find()
            .filter(photo_like::Column::PhotoId.eq(photo_id))
            .filter(photo_like::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Count likes on a photo.
    pub async fn count_likes(&self, photo_id: &str) -> AppResult<u64> {
        PhotoLike::find()
            .filter(photo_like::Column::PhotoId.eq(photo_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Toggle like membership for (user, photo) in a single transaction.
    ///
    /// Deletes the edge if present, inserts it otherwise; the unique
    /// (user_id, photo_id) index guards the concurrent-insert race. The
    /// photo's denormalized like count is adjusted in the same transaction.
    /// Returns the resulting membership state and the edge-set cardinality.
    pub async fn toggle_like(
        &self,
        user_id: &str,
        photo_id: &str,
        like_id: String,
    ) -> AppResult<(bool, u64)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted = PhotoLike::delete_many()
            .filter(photo_like::Column::PhotoId.eq(photo_id))
            .filter(photo_like::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let liked = if deleted.rows_affected == 0 {
            let model = photo_like::ActiveModel {
                id: sea_orm::Set(like_id),
                user_id: sea_orm::Set(user_id.to_string()),
                photo_id: sea_orm::Set(photo_id.to_string()),
                created_at: sea_orm::Set(chrono::Utc::now().into()),
            };
            model
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            Photo::update_many()
                .col_expr(
                    photo::Column::LikeCount,
                    Expr::col(photo::Column::LikeCount).add(1),
                )
                .filter(photo::Column::Id.eq(photo_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            true
        } else {
            Photo::update_many()
                .col_expr(
                    photo::Column::LikeCount,
                    Expr::col(photo::Column::LikeCount).sub(1),
                )
                .filter(photo::Column::Id.eq(photo_id))
                .filter(photo::Column::LikeCount.gt(0))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            false
        };

        let likes_count = PhotoLike::find()
            .filter(photo_like::Column::PhotoId.eq(photo_id))
            .count(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((liked, likes_count))
    }

    /// Which of the given photos the user has liked.
    pub async fn liked_photo_ids(
        &self,
        user_id: &str,
        photo_ids: &[String],
    ) -> AppResult<Vec<String>> {
        if photo_ids.is_empty() {
            return Ok(Vec::new());
        }

        let likes = PhotoLike::find()
            .filter(photo_like::Column::UserId.eq(user_id))
            .filter(photo_like::Column::PhotoId.is_in(photo_ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(likes.into_iter().map(|l| l.photo_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_photo(id: &str, user_id: &str) -> photo::Model {
        photo::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            category_id: None,
            title: "Sunset".to_string(),
            description: None,
            image_key: format!("photos/{user_id}/{id}.jpg"),
            image_url: format!("/media/photos/{user_id}/{id}.jpg"),
            tags: String::new(),
            location: None,
            camera_settings: None,
            like_count: 0,
            view_count: 0,
            is_public: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_like(id: &str, user_id: &str, photo_id: &str) -> photo_like::Model {
        photo_like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            photo_id: photo_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_sort_param_parsing() {
        assert_eq!(PhotoSort::from_param(None), PhotoSort::Newest);
        assert_eq!(PhotoSort::from_param(Some("oldest")), PhotoSort::Oldest);
        assert_eq!(PhotoSort::from_param(Some("popular")), PhotoSort::Popular);
        assert_eq!(PhotoSort::from_param(Some("liked")), PhotoSort::MostLiked);
        assert_eq!(PhotoSort::from_param(Some("bogus")), PhotoSort::Newest);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let photo = create_test_photo("p1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[photo.clone()]])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let result = repo.find_by_id("p1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "p1");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<photo::Model>::new()])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let err = repo.get_by_id("missing").await.unwrap_err();

        assert!(matches!(err, AppError::PhotoNotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_like_inserts_when_absent() {
        let like = create_test_like("l1", "u2", "p1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // delete finds nothing
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                // insert returns the like row
                .append_query_results([[like]])
                // like_count bump
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                // resulting cardinality
                .append_query_results([[count_row(1)]])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let (liked, count) = repo
            .toggle_like("u2", "p1", "l1".to_string())
            .await
            .unwrap();

        assert!(liked);
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_toggle_like_removes_when_present() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // delete removes the existing edge
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    // like_count decrement
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                // resulting cardinality
                .append_query_results([[count_row(0)]])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let (liked, count) = repo
            .toggle_like("u2", "p1", "l2".to_string())
            .await
            .unwrap();

        assert!(!liked);
        assert_eq!(count, 0);
    }

    /// Row shape produced by `PaginatorTrait::count`.
    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        let mut row = std::collections::BTreeMap::new();
        row.insert("num_items", sea_orm::Value::BigInt(Some(n)));
        row
    }
}
