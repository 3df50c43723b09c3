//! Category repository.

use std::sync::Arc;

use crate::entities::{category, photo, Category, Photo};
use photoshare_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Category repository for database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a category by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a category by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<category::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category: {id}")))
    }

    /// Find a category by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<category::Model>> {
        Category::find()
            .filter(category::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All categories ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<category::Model>> {
        Category::find()
            .order_by_asc(category::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all categories.
    pub async fn count(&self) -> AppResult<u64> {
        Category::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count public photos in a category.
    pub async fn count_public_photos(&self, category_id: &str) -> AppResult<u64> {
        Photo::find()
            .filter(photo::Column::CategoryId.eq(category_id))
            .filter(photo::Column::IsPublic.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new category.
    pub async fn create(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a category. Photos referencing it keep existing with their
    /// category reference cleared (SET NULL).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Category::delete_by_id(id)
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

    fn create_test_category(id: &str, name: &str) -> category::Model {
        category::Model {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_all_ordered() {
        let a = create_test_category("c1", "Landscape");
        let b = create_test_category("c2", "Portrait");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[a, b]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let all = repo.find_all().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Landscape");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let err = repo.get_by_id("missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
