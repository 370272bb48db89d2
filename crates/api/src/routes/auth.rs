use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use infra::models::UserRow;
use infra::repos::{CreateUser, UserRepo};

use crate::auth::password::PasswordService;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserRow,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.password.len() < 6 {
        return Err(AppError::BadRequest(
            "password must be at least 6 characters".to_string(),
        ));
    }

    let repo = UserRepo::new(state.db.clone());

    if repo.email_or_username_exists(&req.email, &req.username).await? {
        return Err(AppError::BadRequest(
            "user with this email or username already exists".to_string(),
        ));
    }

    let password_hash = PasswordService::hash_password(&req.password)?;
    let role = req.role.unwrap_or_else(|| "member".to_string());

    let user = repo
        .create(CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            role,
        })
        .await?;

    let token = state
        .jwt_service()
        .create_token(user.id, user.email.clone(), user.role.clone())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "user registered successfully".to_string(),
            token,
            user,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let repo = UserRepo::new(state.db.clone());

    let user = repo
        .get_active_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_string()))?;

    if !PasswordService::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    }

    let token = state
        .jwt_service()
        .create_token(user.id, user.email.clone(), user.role.clone())?;

    Ok(Json(AuthResponse {
        message: "login successful".to_string(),
        token,
        user,
    }))
}

pub async fn profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = UserRepo::new(state.db.clone())
        .get_by_id(claims.user_id()?)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(Json(serde_json::json!({ "user": user })))
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub email: String,
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserRepo::new(state.db.clone())
        .update_profile(claims.user_id()?, &req.username, &req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "profile updated successfully",
        "user": user,
    })))
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.new_password.len() < 6 {
        return Err(AppError::BadRequest(
            "password must be at least 6 characters".to_string(),
        ));
    }

    let repo = UserRepo::new(state.db.clone());
    let user_id = claims.user_id()?;

    let user = repo
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    if !PasswordService::verify_password(&req.current_password, &user.password_hash)? {
        return Err(AppError::BadRequest(
            "current password is incorrect".to_string(),
        ));
    }

    let new_hash = PasswordService::hash_password(&req.new_password)?;
    repo.update_password(user_id, &new_hash).await?;

    Ok(Json(serde_json::json!({
        "message": "password changed successfully"
    })))
}
