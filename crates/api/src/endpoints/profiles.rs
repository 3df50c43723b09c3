//! Profile endpoints: public profiles, own photos, follow toggle, profile
//! editing.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use photoshare_common::{AppError, AppResult, Page};
use photoshare_core::{
    FollowToggleResponse, PhotoResponse, ProfileResponse, UpdateProfileInput,
};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Pagination query for profile listings.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

/// Profile page payload.
#[derive(Serialize)]
pub struct ProfilePageResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub photos: Page<PhotoResponse>,
}

/// Public profile: the user, engagement counts, and their public photos.
async fn profile(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<ProfilePageResponse>> {
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());

    let profile = state.user_service.profile(&username, viewer_id).await?;
    let photos = state
        .photo_service
        .list_for_owner(&profile.user.id, false, query.page, viewer_id)
        .await?;

    Ok(ApiResponse::ok(ProfilePageResponse { profile, photos }))
}

/// The user's own photos, including private ones. Owner only.
async fn own_photos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<PhotoResponse>>> {
    if !user.username.eq_ignore_ascii_case(&username) {
        return Err(AppError::Forbidden(
            "You can only list your own photos".to_string(),
        ));
    }

    let photos = state
        .photo_service
        .list_for_owner(&user.id, true, query.page, Some(&user.id))
        .await?;

    Ok(ApiResponse::ok(photos))
}

/// Toggle the follow edge towards a user.
///
/// Responds with the bare `{is_following, followers_count}` object, or 400
/// on self-follow.
async fn follow_user(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<FollowToggleResponse>> {
    let result = state.follow_service.toggle(&user.id, &username).await?;
    Ok(Json(result))
}

/// Own profile payload for the edit form. Unlike the public profile it
/// carries the account email.
#[derive(Serialize)]
pub struct OwnProfileResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
}

/// Current profile data for the edit form.
async fn profile_edit_form(
    AuthUser(user): AuthUser,
) -> AppResult<ApiResponse<OwnProfileResponse>> {
    Ok(ApiResponse::ok(OwnProfileResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        bio: user.bio,
        website: user.website,
        location: user.location,
        avatar_url: user.avatar_url,
    }))
}

/// Update the authenticated user's profile.
async fn profile_edit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<OwnProfileResponse>> {
    let updated = state.user_service.update_profile(&user.id, input).await?;

    Ok(ApiResponse::ok(OwnProfileResponse {
        id: updated.id,
        username: updated.username,
        email: updated.email,
        bio: updated.bio,
        website: updated.website,
        location: updated.location,
        avatar_url: updated.avatar_url,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        // /profile/edit/ must win over /profile/{username}/
        .route("/profile/edit/", get(profile_edit_form).post(profile_edit))
        .route("/profile/{username}/", get(profile))
        .route("/profile/{username}/photos/", get(own_photos))
        .route("/profile/{username}/follow/", post(follow_user))
}
