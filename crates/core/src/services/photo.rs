//! Photo service: CRUD, listings, detail pages, and view counting.

use photoshare_common::{AppError, AppResult, IdGenerator, Page, Paginator};
use photoshare_db::{
    entities::photo,
    repositories::{
        CategoryRepository, PhotoQuery, PhotoRepository, PhotoSort, UserRepository,
    },
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::comment::{CommentResponse, CommentService};
use crate::services::media::{MediaService, StoredImage};

/// Number of related photos shown on the detail page.
const RELATED_PHOTOS: u64 = 6;

/// Input for uploading a new photo (metadata half of the multipart form).
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UploadPhotoInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub category_id: Option<String>,

    #[validate(length(max = 500))]
    #[serde(default)]
    pub tags: String,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    #[validate(length(max = 200))]
    pub camera_settings: Option<String>,

    #[serde(default = "default_true")]
    pub is_public: bool,
}

const fn default_true() -> bool {
    true
}

/// Input for editing an existing photo.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePhotoInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub description: Option<Option<String>>,

    pub category_id: Option<Option<String>>,

    #[validate(length(max = 500))]
    pub tags: Option<String>,

    pub location: Option<Option<String>>,

    pub camera_settings: Option<Option<String>>,

    pub is_public: Option<bool>,
}

/// Listing parameters as supplied by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoListParams {
    /// Category filter.
    pub category: Option<String>,
    /// Free-text search term.
    pub search: Option<String>,
    /// Sort key: `newest`, `oldest`, `popular`, `liked`.
    pub sort: Option<String>,
    /// 1-indexed page number.
    pub page: Option<u64>,
}

/// A photo in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoResponse {
    pub id: String,
    pub user_id: String,
    pub username: Option<String>,
    pub category_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub camera_settings: Option<String>,
    pub like_count: i32,
    pub view_count: i32,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<photo::Model> for PhotoResponse {
    fn from(p: photo::Model) -> Self {
        let tags = p.tag_list().iter().map(ToString::to_string).collect();
        Self {
            id: p.id,
            user_id: p.user_id,
            username: None,
            category_id: p.category_id,
            title: p.title,
            description: p.description,
            image_url: p.image_url,
            tags,
            location: p.location,
            camera_settings: p.camera_settings,
            like_count: p.like_count,
            view_count: p.view_count,
            is_public: p.is_public,
            is_liked: None,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Detail page payload: the photo plus comments and related photos.
#[derive(Debug, Serialize)]
pub struct PhotoDetailResponse {
    #[serde(flatten)]
    pub photo: PhotoResponse,
    pub category_name: Option<String>,
    pub comments: Vec<CommentResponse>,
    pub related: Vec<PhotoResponse>,
}

/// Service for managing photos.
#[derive(Clone)]
pub struct PhotoService {
    photo_repo: PhotoRepository,
    user_repo: UserRepository,
    category_repo: CategoryRepository,
    comments: CommentService,
    media: MediaService,
    id_gen: IdGenerator,
}

impl PhotoService {
    /// Create a new photo service.
    #[must_use]
    pub const fn new(
        photo_repo: PhotoRepository,
        user_repo: UserRepository,
        category_repo: CategoryRepository,
        comments: CommentService,
        media: MediaService,
    ) -> Self {
        Self {
            photo_repo,
            user_repo,
            category_repo,
            comments,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a photo record for a stored upload.
    pub async fn create(
        &self,
        user_id: &str,
        input: UploadPhotoInput,
        image: &StoredImage,
    ) -> AppResult<PhotoResponse> {
        input.validate()?;

        if let Some(ref category_id) = input.category_id {
            // Reject dangling references up front
            self.category_repo.get_by_id(category_id).await?;
        }

        let model = photo::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            category_id: Set(input.category_id),
            title: Set(input.title),
            description: Set(input.description),
            image_key: Set(image.key.clone()),
            image_url: Set(image.url.clone()),
            tags: Set(normalize_tags(&input.tags)),
            location: Set(input.location),
            camera_settings: Set(input.camera_settings),
            like_count: Set(0),
            view_count: Set(0),
            is_public: Set(input.is_public),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.photo_repo.create(model).await?;
        self.user_repo.adjust_photos_count(user_id, 1).await?;

        tracing::info!(photo_id = %created.id, user_id, "Uploaded photo");
        Ok(created.into())
    }

    /// Edit a photo. Owner only.
    pub async fn update(
        &self,
        user_id: &str,
        photo_id: &str,
        input: UpdatePhotoInput,
    ) -> AppResult<PhotoResponse> {
        input.validate()?;

        let photo = self.photo_repo.get_by_id(photo_id).await?;
        if photo.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can only edit your own photos".to_string(),
            ));
        }

        if let Some(Some(ref category_id)) = input.category_id {
            self.category_repo.get_by_id(category_id).await?;
        }

        let mut active: photo::ActiveModel = photo.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(tags) = input.tags {
            active.tags = Set(normalize_tags(&tags));
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        if let Some(camera_settings) = input.camera_settings {
            active.camera_settings = Set(camera_settings);
        }
        if let Some(is_public) = input.is_public {
            active.is_public = Set(is_public);
        }

        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.photo_repo.update(active).await?;
        Ok(updated.into())
    }

    /// Delete a photo and its stored file. Owner only.
    pub async fn delete(&self, user_id: &str, photo_id: &str) -> AppResult<()> {
        let photo = self.photo_repo.get_by_id(photo_id).await?;
        if photo.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can only delete your own photos".to_string(),
            ));
        }

        self.photo_repo.delete(&photo.id).await?;
        self.user_repo.adjust_photos_count(user_id, -1).await?;

        // The row is gone either way; losing the file is only worth a warning.
        if let Err(e) = self.media.remove(&photo.image_key).await {
            tracing::warn!(error = %e, key = %photo.image_key, "Failed to remove stored file");
        }

        tracing::info!(photo_id, user_id, "Deleted photo");
        Ok(())
    }

    /// Detail page for a photo.
    ///
    /// Visibility: a private photo is only readable by its owner. Every
    /// successful read increments the stored view counter by exactly one
    /// before the payload is assembled.
    pub async fn detail(
        &self,
        photo_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<PhotoDetailResponse> {
        let photo = self.photo_repo.get_by_id(photo_id).await?;

        if !photo.is_public && viewer_id != Some(photo.user_id.as_str()) {
            // Indistinguishable from a missing photo
            return Err(AppError::PhotoNotFound(photo_id.to_string()));
        }

        self.photo_repo.increment_view_count(&photo.id).await?;

        let category_name = match photo.category_id.as_deref() {
            Some(category_id) => self
                .category_repo
                .find_by_id(category_id)
                .await?
                .map(|c| c.name),
            None => None,
        };

        let comments = self.comments.list_for_photo(&photo.id).await?;
        let related_models = self.photo_repo.find_related(&photo, RELATED_PHOTOS).await?;
        let related = self.enrich(related_models, viewer_id).await?;

        let mut response: PhotoResponse = photo.into();
        // The increment above is not reflected in the row we already read
        response.view_count += 1;
        response.username = self
            .user_repo
            .find_by_id(&response.user_id)
            .await?
            .map(|u| u.username);
        if let Some(viewer) = viewer_id {
            response.is_liked = Some(self.photo_repo.has_liked(&response.id, viewer).await?);
        }

        Ok(PhotoDetailResponse {
            photo: response,
            category_name,
            comments,
            related,
        })
    }

    /// Public photo listing with filtering, sorting, search, and pagination.
    pub async fn list_public(
        &self,
        params: &PhotoListParams,
        viewer_id: Option<&str>,
    ) -> AppResult<Page<PhotoResponse>> {
        let query = PhotoQuery {
            only_public: true,
            // Empty query parameters mean "no filter"
            category_id: params.category.clone().filter(|c| !c.is_empty()),
            search: params
                .search
                .clone()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            sort: PhotoSort::from_param(params.sort.as_deref()),
            ..PhotoQuery::default()
        };
        self.list_page(&query, Paginator::photos(), params.page, viewer_id)
            .await
    }

    /// Free-text search over public photos (also matches location).
    pub async fn search(
        &self,
        term: &str,
        page: Option<u64>,
        viewer_id: Option<&str>,
    ) -> AppResult<Page<PhotoResponse>> {
        let query = PhotoQuery {
            only_public: true,
            search: Some(term.to_string()),
            search_location: true,
            sort: PhotoSort::Newest,
            ..PhotoQuery::default()
        };
        self.list_page(&query, Paginator::photos(), page, viewer_id)
            .await
    }

    /// Public photos of one owner (profile page).
    pub async fn list_for_owner(
        &self,
        owner_id: &str,
        include_private: bool,
        page: Option<u64>,
        viewer_id: Option<&str>,
    ) -> AppResult<Page<PhotoResponse>> {
        let query = PhotoQuery {
            only_public: !include_private,
            owner_id: Some(owner_id.to_string()),
            sort: PhotoSort::Newest,
            ..PhotoQuery::default()
        };
        self.list_page(&query, Paginator::photos(), page, viewer_id)
            .await
    }

    /// Public photos in a category, newest first.
    pub async fn list_for_category(
        &self,
        category_id: &str,
        page: Option<u64>,
        viewer_id: Option<&str>,
    ) -> AppResult<Page<PhotoResponse>> {
        let query = PhotoQuery {
            only_public: true,
            category_id: Some(category_id.to_string()),
            sort: PhotoSort::Newest,
            ..PhotoQuery::default()
        };
        self.list_page(&query, Paginator::photos(), page, viewer_id)
            .await
    }

    /// Featured photos for the home page: top by views, then recency.
    pub async fn featured(&self, limit: u64) -> AppResult<Vec<PhotoResponse>> {
        let query = PhotoQuery {
            only_public: true,
            sort: PhotoSort::Popular,
            ..PhotoQuery::default()
        };
        let models = self.photo_repo.find_filtered(&query, limit, 0).await?;
        self.enrich(models, None).await
    }

    /// Most recent public photos for the home page.
    pub async fn recent(&self, limit: u64) -> AppResult<Vec<PhotoResponse>> {
        let query = PhotoQuery::public();
        let models = self.photo_repo.find_filtered(&query, limit, 0).await?;
        self.enrich(models, None).await
    }

    async fn list_page(
        &self,
        query: &PhotoQuery,
        paginator: Paginator,
        requested_page: Option<u64>,
        viewer_id: Option<&str>,
    ) -> AppResult<Page<PhotoResponse>> {
        let total = self.photo_repo.count_filtered(query).await?;
        let page = paginator.clamp_page(requested_page, total);
        let models = self
            .photo_repo
            .find_filtered(query, paginator.per_page(), paginator.offset(page))
            .await?;

        let items = self.enrich(models, viewer_id).await?;
        Ok(paginator.page_of(items, page, total))
    }

    /// Resolve usernames and the viewer's like state for a batch of photos.
    async fn enrich(
        &self,
        models: Vec<photo::Model>,
        viewer_id: Option<&str>,
    ) -> AppResult<Vec<PhotoResponse>> {
        let mut user_ids: Vec<String> = models.iter().map(|p| p.user_id.clone()).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let users = self.user_repo.find_by_ids(&user_ids).await?;
        let usernames: std::collections::HashMap<String, String> =
            users.into_iter().map(|u| (u.id, u.username)).collect();

        let liked_ids: std::collections::HashSet<String> = match viewer_id {
            Some(viewer) => {
                let photo_ids: Vec<String> = models.iter().map(|p| p.id.clone()).collect();
                self.photo_repo
                    .liked_photo_ids(viewer, &photo_ids)
                    .await?
                    .into_iter()
                    .collect()
            }
            None => std::collections::HashSet::new(),
        };

        Ok(models
            .into_iter()
            .map(|model| {
                let username = usernames.get(&model.user_id).cloned();
                let is_liked = viewer_id.map(|_| liked_ids.contains(&model.id));
                let mut response: PhotoResponse = model.into();
                response.username = username;
                response.is_liked = is_liked;
                response
            })
            .collect())
    }
}

/// Normalize a comma-separated tag string: trim entries, drop empties.
fn normalize_tags(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags() {
        assert_eq!(normalize_tags("a, b ,, c "), "a, b, c");
        assert_eq!(normalize_tags(""), "");
        assert_eq!(normalize_tags(" , , "), "");
    }

    #[test]
    fn test_upload_input_requires_title() {
        let input = UploadPhotoInput {
            title: String::new(),
            ..UploadPhotoInput::default()
        };
        assert!(input.validate().is_err());

        let input = UploadPhotoInput {
            title: "Sunset".to_string(),
            ..UploadPhotoInput::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_input_can_clear_category() {
        let input = UpdatePhotoInput {
            category_id: Some(None),
            ..UpdatePhotoInput::default()
        };
        assert!(input.validate().is_ok());
    }
}
