//! Like service: the photo like toggle.

use photoshare_common::{AppResult, IdGenerator};
use photoshare_db::repositories::PhotoRepository;
use serde::Serialize;

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LikeToggleResponse {
    /// Whether the acting user likes the photo after the toggle.
    pub liked: bool,
    /// Resulting cardinality of the photo's like edge set.
    pub likes_count: u64,
}

/// Service for toggling like membership on photos.
#[derive(Clone)]
pub struct LikeService {
    photo_repo: PhotoRepository,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(photo_repo: PhotoRepository) -> Self {
        Self {
            photo_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the (user, photo) like edge.
    ///
    /// Inserts the edge if absent, removes it if present, and reports the
    /// resulting state together with the photo's like count. The whole
    /// operation runs in one store transaction.
    pub async fn toggle(&self, user_id: &str, photo_id: &str) -> AppResult<LikeToggleResponse> {
        // 404 before touching the edge set
        let photo = self.photo_repo.get_by_id(photo_id).await?;

        let (liked, likes_count) = self
            .photo_repo
            .toggle_like(user_id, &photo.id, self.id_gen.generate())
            .await?;

        tracing::debug!(user_id, photo_id, liked, "Toggled photo like");

        Ok(LikeToggleResponse { liked, likes_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use photoshare_common::AppError;
    use photoshare_db::entities::{photo, photo_like};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_photo(id: &str) -> photo::Model {
        photo::Model {
            id: id.to_string(),
            user_id: "owner".to_string(),
            category_id: None,
            title: "Sunset".to_string(),
            description: None,
            image_key: "photos/owner/p.jpg".to_string(),
            image_url: "/media/photos/owner/p.jpg".to_string(),
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

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        let mut row = std::collections::BTreeMap::new();
        row.insert("num_items", sea_orm::Value::BigInt(Some(n)));
        row
    }

    #[tokio::test]
    async fn test_toggle_missing_photo_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<photo::Model>::new()])
                .into_connection(),
        );

        let service = LikeService::new(PhotoRepository::new(db));
        let err = service.toggle("u1", "missing").await.unwrap_err();

        assert!(matches!(err, AppError::PhotoNotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_likes_then_reports_state() {
        let like = photo_like::Model {
            id: "l1".to_string(),
            user_id: "u1".to_string(),
            photo_id: "p1".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // photo lookup
                .append_query_results([[test_photo("p1")]])
                // delete finds nothing
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                // insert + count
                .append_query_results([[like]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[count_row(1)]])
                .into_connection(),
        );

        let service = LikeService::new(PhotoRepository::new(db));
        let result = service.toggle("u1", "p1").await.unwrap();

        assert!(result.liked);
        assert_eq!(result.likes_count, 1);
    }
}
