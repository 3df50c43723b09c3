//! Category service.

use photoshare_common::AppResult;
use photoshare_db::{
    entities::category,
    repositories::CategoryRepository,
};
use serde::Serialize;

/// A category together with its public photo count.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub photo_count: u64,
    pub created_at: String,
}

impl CategoryResponse {
    fn from_model(c: category::Model, photo_count: u64) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            photo_count,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Service for photo categories.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(category_repo: CategoryRepository) -> Self {
        Self { category_repo }
    }

    /// Get a category by ID.
    pub async fn get(&self, id: &str) -> AppResult<CategoryResponse> {
        let category = self.category_repo.get_by_id(id).await?;
        let count = self.category_repo.count_public_photos(&category.id).await?;
        Ok(CategoryResponse::from_model(category, count))
    }

    /// All categories with their public photo counts, ordered by name.
    pub async fn list(&self) -> AppResult<Vec<CategoryResponse>> {
        let categories = self.category_repo.find_all().await?;

        let mut responses = Vec::with_capacity(categories.len());
        for category in categories {
            let count = self.category_repo.count_public_photos(&category.id).await?;
            responses.push(CategoryResponse::from_model(category, count));
        }
        Ok(responses)
    }

    /// The categories with the most public photos.
    pub async fn top(&self, limit: usize) -> AppResult<Vec<CategoryResponse>> {
        let mut all = self.list().await?;
        all.sort_by(|a, b| b.photo_count.cmp(&a.photo_count));
        all.truncate(limit);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_category(id: &str, name: &str) -> category::Model {
        category::Model {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now().into(),
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        let mut row = std::collections::BTreeMap::new();
        row.insert("num_items", sea_orm::Value::BigInt(Some(n)));
        row
    }

    #[tokio::test]
    async fn test_top_orders_by_photo_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    test_category("c1", "Landscape"),
                    test_category("c2", "Portrait"),
                ]])
                .append_query_results([[count_row(3)]])
                .append_query_results([[count_row(9)]])
                .into_connection(),
        );

        let service = CategoryService::new(CategoryRepository::new(db));
        let top = service.top(2).await.unwrap();

        assert_eq!(top[0].name, "Portrait");
        assert_eq!(top[0].photo_count, 9);
        assert_eq!(top[1].photo_count, 3);
    }
}
