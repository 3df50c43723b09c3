//! Comment service.

use photoshare_common::{AppError, AppResult, IdGenerator};
use photoshare_db::{
    entities::comment,
    repositories::{CommentRepository, PhotoRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for appending a comment to a photo.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

/// A comment with its author's username resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub photo_id: String,
    pub user_id: String,
    pub username: Option<String>,
    pub content: String,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            photo_id: c.photo_id,
            user_id: c.user_id,
            username: None,
            content: c.content,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Service for photo comments.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    photo_repo: PhotoRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        photo_repo: PhotoRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            comment_repo,
            photo_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append a comment to a photo.
    pub async fn add(
        &self,
        user_id: &str,
        photo_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<CommentResponse> {
        input.validate()?;

        // 404 before persisting anything
        let photo = self.photo_repo.get_by_id(photo_id).await?;
        if !photo.is_public && photo.user_id != user_id {
            // Same answer as a missing photo
            return Err(AppError::PhotoNotFound(photo_id.to_string()));
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            photo_id: Set(photo.id),
            user_id: Set(user_id.to_string()),
            content: Set(input.content),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let comment = self.comment_repo.create(model).await?;

        let mut response: CommentResponse = comment.into();
        response.username = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .map(|u| u.username);
        Ok(response)
    }

    /// Comments on a photo, newest first, with author usernames resolved.
    pub async fn list_for_photo(&self, photo_id: &str) -> AppResult<Vec<CommentResponse>> {
        let comments = self.comment_repo.find_by_photo(photo_id).await?;

        let mut user_ids: Vec<String> = comments.iter().map(|c| c.user_id.clone()).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let users = self.user_repo.find_by_ids(&user_ids).await?;
        let usernames: std::collections::HashMap<String, String> = users
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(comments
            .into_iter()
            .map(|c| {
                let username = usernames.get(&c.user_id).cloned();
                let mut response: CommentResponse = c.into();
                response.username = username;
                response
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_comment_rejected() {
        let input = CreateCommentInput {
            content: String::new(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_reasonable_comment_accepted() {
        let input = CreateCommentInput {
            content: "Nice shot!".to_string(),
        };
        assert!(input.validate().is_ok());
    }
}
