//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use photoshare_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Registration response.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Create a new account and sign the user in.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let input = photoshare_core::CreateUserInput {
        username: req.username,
        email: req.email,
        password: req.password,
    };

    let user = state.user_service.register(input).await?;

    Ok(ApiResponse::ok(RegisterResponse {
        id: user.id.clone(),
        username: user.username,
        token: user.token.unwrap_or_default(),
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Sign in with username and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = state
        .user_service
        .authenticate(&req.username, &req.password)
        .await?;

    Ok(ApiResponse::ok(LoginResponse {
        id: user.id.clone(),
        username: user.username,
        token: user.token.unwrap_or_default(),
    }))
}

/// Logout response.
#[derive(Serialize)]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Sign out by rotating the token, invalidating the presented one.
async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<LogoutResponse>> {
    state.user_service.regenerate_token(&user.id).await?;

    Ok(ApiResponse::ok(LogoutResponse { ok: true }))
}

/// Password reset request.
#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Password reset response. Always neutral: no signal about whether the
/// email exists.
#[derive(Serialize)]
pub struct PasswordResetResponse {
    pub message: String,
}

/// Accept a password reset request.
async fn password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> AppResult<ApiResponse<PasswordResetResponse>> {
    state.user_service.request_password_reset(&req.email).await?;

    Ok(ApiResponse::ok(PasswordResetResponse {
        message: format!(
            "If an account with email {} exists, you will receive a password reset link shortly.",
            req.email
        ),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register/", post(register))
        .route("/login/", post(login))
        .route("/logout/", post(logout))
        .route("/password-reset/", post(password_reset))
}
