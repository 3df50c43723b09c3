//! Photo endpoints: listing, detail, upload, edit, delete, like, comment.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
};
use photoshare_common::{AppError, AppResult, Page};
use photoshare_core::{
    CreateCommentInput, LikeToggleResponse, PhotoDetailResponse, PhotoListParams, PhotoResponse,
    UpdatePhotoInput, UploadPhotoInput,
};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Public photo listing with filtering, search, sorting, and pagination.
async fn list_photos(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Query(params): Query<PhotoListParams>,
) -> AppResult<ApiResponse<Page<PhotoResponse>>> {
    let viewer_id = user.as_ref().map(|u| u.id.as_str());
    let page = state.photo_service.list_public(&params, viewer_id).await?;
    Ok(ApiResponse::ok(page))
}

/// Photo detail. Increments the view counter on every read.
async fn photo_detail(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> AppResult<ApiResponse<PhotoDetailResponse>> {
    let viewer_id = user.as_ref().map(|u| u.id.as_str());
    let detail = state.photo_service.detail(&photo_id, viewer_id).await?;
    Ok(ApiResponse::ok(detail))
}

/// Upload a new photo via multipart form.
async fn upload_photo(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<PhotoResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name = String::from("upload");
    let mut content_type = String::from("application/octet-stream");
    let mut input = UploadPhotoInput {
        is_public: true,
        ..UploadPhotoInput::default()
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" => {
                if let Some(original) = field.file_name() {
                    file_name = original.to_string();
                }
                if let Some(ct) = field.content_type() {
                    content_type = ct.to_string();
                }
                file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?
                        .to_vec(),
                );
            }
            "title" => input.title = text_field(field).await?,
            "description" => input.description = optional(text_field(field).await?),
            "category_id" => input.category_id = optional(text_field(field).await?),
            "tags" => input.tags = text_field(field).await?,
            "location" => input.location = optional(text_field(field).await?),
            "camera_settings" => input.camera_settings = optional(text_field(field).await?),
            "is_public" => input.is_public = parse_bool(&text_field(field).await?),
            _ => {}
        }
    }

    let data = file_data.ok_or_else(|| AppError::Validation("Image file is required".to_string()))?;

    let stored = state
        .media_service
        .store_photo(&user.id, &file_name, &content_type, &data)
        .await?;

    let photo = state.photo_service.create(&user.id, input, &stored).await?;
    Ok(ApiResponse::ok(photo))
}

/// Edit a photo. Owner only.
async fn edit_photo(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
    Json(input): Json<UpdatePhotoInput>,
) -> AppResult<ApiResponse<PhotoResponse>> {
    let photo = state
        .photo_service
        .update(&user.id, &photo_id, input)
        .await?;
    Ok(ApiResponse::ok(photo))
}

/// Delete a photo. Owner only.
async fn delete_photo(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.photo_service.delete(&user.id, &photo_id).await?;
    Ok(ApiResponse::ok(()))
}

/// Toggle the like edge for the acting user.
///
/// Responds with the bare `{liked, likes_count}` object.
async fn like_photo(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> AppResult<Json<LikeToggleResponse>> {
    let result = state.like_service.toggle(&user.id, &photo_id).await?;
    Ok(Json(result))
}

/// Append a comment to a photo.
async fn comment_photo(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<photoshare_core::CommentResponse>> {
    let comment = state
        .comment_service
        .add(&user.id, &photo_id, input)
        .await?;
    Ok(ApiResponse::ok(comment))
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

fn optional(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

fn parse_bool(text: &str) -> bool {
    matches!(text, "true" | "on" | "1")
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/photos/", get(list_photos))
        .route("/photo/upload/", post(upload_photo))
        .route("/photo/{id}/", get(photo_detail))
        .route("/photo/{id}/edit/", post(edit_photo))
        .route("/photo/{id}/delete/", post(delete_photo))
        .route("/photo/{id}/like/", post(like_photo))
        .route("/photo/{id}/comment/", post(comment_photo))
}
