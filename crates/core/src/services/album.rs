//! Album service.

use photoshare_common::{AppError, AppResult, IdGenerator, Page, Paginator};
use photoshare_db::{
    entities::{album, album_photo},
    repositories::{AlbumRepository, AlbumSort, PhotoRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::photo::PhotoResponse;

/// Input for creating an album.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateAlbumInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Photos to include; all must belong to the creator.
    #[serde(default)]
    pub photo_ids: Vec<String>,

    /// Optional cover photo; must be one of the creator's photos.
    pub cover_photo_id: Option<String>,

    #[serde(default = "default_true")]
    pub is_public: bool,
}

const fn default_true() -> bool {
    true
}

/// An album in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct AlbumResponse {
    pub id: String,
    pub user_id: String,
    pub username: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub cover_photo_id: Option<String>,
    pub photo_count: u64,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl AlbumResponse {
    fn from_model(a: album::Model, photo_count: u64) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            username: None,
            title: a.title,
            description: a.description,
            cover_photo_id: a.cover_photo_id,
            photo_count,
            is_public: a.is_public,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Album listing payload with the hero-section totals.
#[derive(Debug, Serialize)]
pub struct AlbumListing {
    #[serde(flatten)]
    pub page: Page<AlbumResponse>,
    pub stats: AlbumStats,
}

/// Site-wide totals shown with the album listing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AlbumStats {
    pub total_albums: u64,
    pub total_photos: u64,
    pub photographers_count: u64,
}

/// Album detail payload: the album and its visible photos.
#[derive(Debug, Serialize)]
pub struct AlbumDetailResponse {
    #[serde(flatten)]
    pub album: AlbumResponse,
    pub photos: Vec<PhotoResponse>,
}

/// Service for managing albums.
#[derive(Clone)]
pub struct AlbumService {
    album_repo: AlbumRepository,
    photo_repo: PhotoRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl AlbumService {
    /// Create a new album service.
    #[must_use]
    pub const fn new(
        album_repo: AlbumRepository,
        photo_repo: PhotoRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            album_repo,
            photo_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an album with its photo memberships.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateAlbumInput,
    ) -> AppResult<AlbumResponse> {
        input.validate()?;

        // Membership and cover are restricted to the creator's own photos.
        for photo_id in &input.photo_ids {
            let photo = self.photo_repo.get_by_id(photo_id).await?;
            if photo.user_id != user_id {
                return Err(AppError::Forbidden(
                    "Albums can only contain your own photos".to_string(),
                ));
            }
        }
        if let Some(ref cover_id) = input.cover_photo_id {
            let cover = self.photo_repo.get_by_id(cover_id).await?;
            if cover.user_id != user_id {
                return Err(AppError::Forbidden(
                    "The cover must be one of your own photos".to_string(),
                ));
            }
        }

        let album_id = self.id_gen.generate();
        let now = chrono::Utc::now();

        let model = album::ActiveModel {
            id: Set(album_id.clone()),
            user_id: Set(user_id.to_string()),
            title: Set(input.title),
            description: Set(input.description),
            cover_photo_id: Set(input.cover_photo_id),
            is_public: Set(input.is_public),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let mut seen = std::collections::HashSet::new();
        let memberships = input
            .photo_ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .map(|photo_id| album_photo::ActiveModel {
                id: Set(self.id_gen.generate()),
                album_id: Set(album_id.clone()),
                photo_id: Set(photo_id),
                created_at: Set(now.into()),
            })
            .collect::<Vec<_>>();
        let photo_count = memberships.len() as u64;

        let created = self.album_repo.create(model, memberships).await?;
        tracing::info!(album_id = %created.id, user_id, "Created album");

        Ok(AlbumResponse::from_model(created, photo_count))
    }

    /// Public album listing with sorting, pagination, and site totals.
    pub async fn list_public(
        &self,
        sort: Option<&str>,
        page: Option<u64>,
    ) -> AppResult<AlbumListing> {
        let paginator = Paginator::albums();
        let sort = AlbumSort::from_param(sort);

        let total = self.album_repo.count_public().await?;
        let page_number = paginator.clamp_page(page, total);
        let models = self
            .album_repo
            .find_public(sort, paginator.per_page(), paginator.offset(page_number))
            .await?;

        let mut items = Vec::with_capacity(models.len());
        for model in models {
            let photo_count = self.album_repo.count_photos(&model.id).await?;
            let username = self
                .user_repo
                .find_by_id(&model.user_id)
                .await?
                .map(|u| u.username);
            let mut response = AlbumResponse::from_model(model, photo_count);
            response.username = username;
            items.push(response);
        }

        let stats = AlbumStats {
            total_albums: total,
            total_photos: self.photo_repo.count_public().await?,
            photographers_count: self.user_repo.count_photographers().await?,
        };

        Ok(AlbumListing {
            page: paginator.page_of(items, page_number, total),
            stats,
        })
    }

    /// Album detail with its publicly visible photos.
    ///
    /// A private album is only readable by its owner.
    pub async fn detail(
        &self,
        album_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<AlbumDetailResponse> {
        let album = self.album_repo.get_by_id(album_id).await?;

        if !album.is_public && viewer_id != Some(album.user_id.as_str()) {
            return Err(AppError::NotFound(format!("Album: {album_id}")));
        }

        let photo_count = self.album_repo.count_photos(&album.id).await?;
        let username = self
            .user_repo
            .find_by_id(&album.user_id)
            .await?
            .map(|u| u.username);

        let photos = self
            .album_repo
            .find_photos(&album.id)
            .await?
            .into_iter()
            .map(PhotoResponse::from)
            .collect();

        let mut response = AlbumResponse::from_model(album, photo_count);
        response.username = username;

        Ok(AlbumDetailResponse {
            album: response,
            photos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_input_requires_title() {
        let input = CreateAlbumInput {
            title: String::new(),
            ..CreateAlbumInput::default()
        };
        assert!(input.validate().is_err());

        let input = CreateAlbumInput {
            title: "Road trip".to_string(),
            ..CreateAlbumInput::default()
        };
        assert!(input.validate().is_ok());
    }
}
