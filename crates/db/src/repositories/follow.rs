//! Follow repository.

use std::sync::Arc;

use crate::entities::{follow, user, Follow, User};
use photoshare_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, TransactionTrait, sea_query::Expr,
};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        let count = Follow::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FolloweeId.eq(followee_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FolloweeId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users a user is following.
    pub async fn count_following(&self, user_id: &str) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Toggle follow membership for (follower, followee) in a single
    /// transaction.
    ///
    /// Deletes the edge if present, inserts it otherwise; the unique
    /// (follower_id, followee_id) index guards the concurrent-insert race
    /// and the table CHECK constraint rejects self-follows outright. Both
    /// users' denormalized counts are adjusted in the same transaction.
    /// Returns the resulting membership state and the followee's follower
    /// count.
    pub async fn toggle_follow(
        &self,
        follower_id: &str,
        followee_id: &str,
        follow_id: String,
    ) -> AppResult<(bool, u64)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted = Follow::delete_many()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FolloweeId.eq(followee_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let is_following = if deleted.rows_affected == 0 {
            let model = follow::ActiveModel {
                id: sea_orm::Set(follow_id),
                follower_id: sea_orm::Set(follower_id.to_string()),
                followee_id: sea_orm::Set(followee_id.to_string()),
                created_at: sea_orm::Set(chrono::Utc::now().into()),
            };
            model
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            adjust_count(&txn, follower_id, user::Column::FollowingCount, 1).await?;
            adjust_count(&txn, followee_id, user::Column::FollowersCount, 1).await?;
            true
        } else {
            adjust_count(&txn, follower_id, user::Column::FollowingCount, -1).await?;
            adjust_count(&txn, followee_id, user::Column::FollowersCount, -1).await?;
            false
        };

        let followers_count = Follow::find()
            .filter(follow::Column::FolloweeId.eq(followee_id))
            .count(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((is_following, followers_count))
    }
}

/// Adjust a denormalized count column on the user row.
async fn adjust_count<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    column: user::Column,
    delta: i32,
) -> AppResult<()> {
    let mut update = User::update_many().filter(user::Column::Id.eq(user_id));

    if delta >= 0 {
        update = update.col_expr(column, Expr::col(column).add(delta));
    } else {
        update = update
            .col_expr(column, Expr::col(column).sub(-delta))
            .filter(Expr::col(column).gte(-delta));
    }

    update
        .exec(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_follow(id: &str, follower_id: &str, followee_id: &str) -> follow::Model {
        follow::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    /// Row shape produced by `PaginatorTrait::count`.
    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        let mut row = std::collections::BTreeMap::new();
        row.insert("num_items", sea_orm::Value::BigInt(Some(n)));
        row
    }

    #[tokio::test]
    async fn test_is_following_true() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(1)]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        assert!(repo.is_following("u1", "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_following_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(0)]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        assert!(!repo.is_following("u1", "u3").await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_follow_creates_edge() {
        let edge = create_test_follow("f1", "u1", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // delete finds nothing
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                // insert returns the edge
                .append_query_results([[edge]])
                // two denormalized count updates
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                // resulting follower count
                .append_query_results([[count_row(1)]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let (is_following, followers) = repo
            .toggle_follow("u1", "u2", "f1".to_string())
            .await
            .unwrap();

        assert!(is_following);
        assert_eq!(followers, 1);
    }

    #[tokio::test]
    async fn test_toggle_follow_removes_edge() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // delete removes the edge, then two count updates
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                // resulting follower count
                .append_query_results([[count_row(0)]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let (is_following, followers) = repo
            .toggle_follow("u1", "u2", "f2".to_string())
            .await
            .unwrap();

        assert!(!is_following);
        assert_eq!(followers, 0);
    }
}
