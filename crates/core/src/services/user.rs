//! User service: registration, authentication, and profiles.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use once_cell::sync::Lazy;
use photoshare_common::{AppError, AppResult, IdGenerator};
use photoshare_db::{
    entities::user,
    repositories::{FollowRepository, PhotoRepository, UserRepository},
};
use regex::Regex;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[allow(clippy::expect_used)]
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid username pattern"));

/// Input for creating a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Input for updating the profile of the authenticated user.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(email, length(max = 254))]
    pub email: Option<String>,

    #[validate(length(max = 2048))]
    pub bio: Option<String>,

    #[validate(url, length(max = 512))]
    pub website: Option<String>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    /// Profile image URL (set by the API layer after storing the upload).
    pub avatar_url: Option<String>,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub followers_count: i32,
    pub following_count: i32,
    pub photos_count: i32,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            bio: u.bio,
            website: u.website,
            location: u.location,
            avatar_url: u.avatar_url,
            followers_count: u.followers_count,
            following_count: u.following_count,
            photos_count: u.photos_count,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Profile page payload: the user plus engagement counts and the viewer's
/// follow state.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub is_following: bool,
    pub total_views: i64,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    photo_repo: PhotoRepository,
    follow_repo: FollowRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        photo_repo: PhotoRepository,
        follow_repo: FollowRepository,
    ) -> Self {
        Self {
            user_repo,
            photo_repo,
            follow_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account.
    pub async fn register(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        if !USERNAME_RE.is_match(&input.username) {
            return Err(AppError::Validation(
                "Username may only contain letters, digits and underscores".to_string(),
            ));
        }

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Validation("Username already taken".to_string()));
        }

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Validation(
                "Email address already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;
        let token = self.id_gen.generate_token();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            email: Set(input.email),
            password_hash: Set(password_hash),
            token: Set(Some(token)),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Registered new user");
        Ok(user)
    }

    /// Authenticate with username and password.
    ///
    /// Failures are indistinguishable between unknown username and wrong
    /// password.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Authenticate by access token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Rotate a user's access token, invalidating the previous one.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<String> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let new_token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(new_token.clone()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await?;

        Ok(new_token)
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_username(username).await
    }

    /// Update the authenticated user's profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        if let Some(ref email) = input.email
            && email != &user.email
            && self.user_repo.find_by_email(email).await?.is_some()
        {
            return Err(AppError::Validation(
                "Email address already registered".to_string(),
            ));
        }

        let mut active: user::ActiveModel = user.into();

        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(website) = input.website {
            active.website = Set(Some(website));
        }
        if let Some(location) = input.location {
            active.location = Set(Some(location));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }

        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Profile page data for a username, as seen by an optional viewer.
    pub async fn profile(
        &self,
        username: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<ProfileResponse> {
        let user = self.user_repo.get_by_username(username).await?;

        let is_following = match viewer_id {
            Some(viewer) if viewer != user.id => {
                self.follow_repo.is_following(viewer, &user.id).await?
            }
            _ => false,
        };

        let total_views = self.photo_repo.total_views_for_user(&user.id).await?;

        Ok(ProfileResponse {
            user: user.into(),
            is_following,
            total_views,
        })
    }

    /// Accept a password-reset request without revealing whether the email
    /// exists.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        match self.user_repo.find_by_email(email).await? {
            Some(user) => {
                tracing::info!(user_id = %user.id, "Password reset requested");
            }
            None => {
                tracing::debug!("Password reset requested for unknown email");
            }
        }
        Ok(())
    }
}

/// Hash a password with Argon2id and a random salt.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against a stored Argon2 hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_username_charset() {
        assert!(USERNAME_RE.is_match("alice_99"));
        assert!(!USERNAME_RE.is_match("alice smith"));
        assert!(!USERNAME_RE.is_match("alice@x"));
        assert!(!USERNAME_RE.is_match(""));
    }

    #[test]
    fn test_create_input_validation() {
        let input = CreateUserInput {
            username: "alice".to_string(),
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
        };
        assert!(input.validate().is_err());

        let input = CreateUserInput {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(input.validate().is_err());

        let input = CreateUserInput {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "longenough".to_string(),
        };
        assert!(input.validate().is_ok());
    }
}
