//! Authentication and profile handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{issue_token, AppError, AppState, AuthUser, SuccessResponse};
use energyai_core::auth::{hash_password, verify_password};
use energyai_core::models::PublicUser;

/// Request body for signup
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for profile update
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: String,
    pub email: String,
}

/// Response carrying a fresh bearer token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// POST /api/signup - Register a new user
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let name = body.name.trim();
    let email = body.email.trim();

    if name.is_empty() || email.is_empty() {
        return Err(AppError::bad_request("Name and email are required"));
    }
    if !email.contains('@') {
        return Err(AppError::bad_request("Invalid email address"));
    }
    if body.password.len() < 8 {
        return Err(AppError::bad_request(
            "Password must be at least 8 characters",
        ));
    }

    let password_hash = hash_password(&body.password)?;
    let user_id = state.db.create_user(email, &password_hash, name)?;
    let token = issue_token(user_id, email, &state.config)?;

    info!(user_id, "User registered");

    Ok(Json(AuthResponse {
        token,
        user: PublicUser {
            id: user_id,
            email: email.to_string(),
            name: name.to_string(),
        },
    }))
}

/// POST /api/login - Exchange credentials for a bearer token
///
/// Unknown email and wrong password answer identically so the endpoint
/// cannot be used to probe which addresses are registered.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state.db.get_user_by_email(body.email.trim())?;

    let Some(user) = user else {
        return Err(AppError::bad_request("Invalid credentials"));
    };

    if !verify_password(&body.password, &user.password_hash) {
        return Err(AppError::bad_request("Invalid credentials"));
    }

    let token = issue_token(user.id, &user.email, &state.config)?;

    info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: user.public(),
    }))
}

/// GET /api/me - Get the currently authenticated user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .db
        .get_user(claims.sub)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user.public()))
}

/// PUT /api/profile - Update the current user's name and email
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(body): Json<ProfileUpdateRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let name = body.name.trim();
    let email = body.email.trim();

    if name.is_empty() || !email.contains('@') {
        return Err(AppError::bad_request("Valid name and email are required"));
    }

    state.db.update_user_profile(claims.sub, name, email)?;

    Ok(Json(SuccessResponse { success: true }))
}
