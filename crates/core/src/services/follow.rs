//! Follow service: the user follow toggle.

use photoshare_common::{AppError, AppResult, IdGenerator};
use photoshare_db::repositories::{FollowRepository, UserRepository};
use serde::Serialize;

/// Result of a follow toggle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FollowToggleResponse {
    /// Whether the actor follows the target after the toggle.
    pub is_following: bool,
    /// Resulting follower count of the target user.
    pub followers_count: u64,
}

/// Service for toggling follow edges between users.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository, user_repo: UserRepository) -> Self {
        Self {
            follow_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the (actor, target) follow edge.
    ///
    /// Self-follow is always rejected, regardless of existing state. The
    /// toggle itself runs in one store transaction and also maintains both
    /// users' denormalized counts.
    pub async fn toggle(
        &self,
        actor_id: &str,
        target_username: &str,
    ) -> AppResult<FollowToggleResponse> {
        let target = self.user_repo.get_by_username(target_username).await?;

        if target.id == actor_id {
            return Err(AppError::BadRequest(
                "You cannot follow yourself".to_string(),
            ));
        }

        let (is_following, followers_count) = self
            .follow_repo
            .toggle_follow(actor_id, &target.id, self.id_gen.generate())
            .await?;

        tracing::debug!(
            actor_id,
            target_id = %target.id,
            is_following,
            "Toggled follow"
        );

        Ok(FollowToggleResponse {
            is_following,
            followers_count,
        })
    }
}
