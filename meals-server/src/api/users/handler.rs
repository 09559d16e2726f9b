//! User API Handlers

use axum::{Json, extract::State};
use chrono::{Duration, Utc};
use shared::request::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
};
use shared::response::{AuthResponse, StatusResponse};
use shared::types::Role;

use crate::auth::RESET_TOKEN_MINUTES;
use crate::core::ServerState;
use crate::db::models::{User, UserCreate};
use crate::db::repository::{RepoError, UserRepository};
use crate::utils::{
    AppError, AppResult, MAX_NAME_LEN, validate_email, validate_password,
};
use shared::models::CartData;

/// POST /api/user/register - 注册并签发 token
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    if req.name.trim().is_empty() || req.name.len() > MAX_NAME_LEN {
        return Err(AppError::validation("Invalid name"));
    }

    let repo = UserRepository::new(state.db.clone());
    let role = req.role.unwrap_or(Role::User);
    let hash_pass = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let user = match repo
        .create(UserCreate {
            name: req.name,
            email: req.email,
            hash_pass,
            role,
            cart: CartData::new(),
        })
        .await
    {
        Ok(user) => user,
        // The unique index is the authority on duplicates, no pre-check
        Err(RepoError::Duplicate(_)) => {
            return Ok(Json(AuthResponse::failure("User already exists")));
        }
        Err(e) => return Err(e.into()),
    };

    let token = state
        .jwt_service
        .generate_token(&user.id_string(), role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(user = user.id_string(), "User registered");
    Ok(Json(AuthResponse::ok(token, role)))
}

/// POST /api/user/login - 登录并签发 token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let repo = UserRepository::new(state.db.clone());

    let Some(user) = repo.find_by_email(&req.email).await? else {
        return Ok(Json(AuthResponse::failure("User does not exist")));
    };
    if !user.verify_password(&req.password).unwrap_or(false) {
        return Ok(Json(AuthResponse::failure("Invalid credentials")));
    }
    // A user token must not open the admin surface and vice versa
    if user.role != req.role {
        return Ok(Json(AuthResponse::failure("Invalid role for this account")));
    }

    let token = state
        .jwt_service
        .generate_token(&user.id_string(), user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(Json(AuthResponse::ok(token, user.role)))
}

/// POST /api/user/forgot-password - 生成限时重置 token 并发送邮件
pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AppResult<Json<StatusResponse>> {
    validate_email(&req.email)?;

    let repo = UserRepository::new(state.db.clone());
    let Some(user) = repo.find_by_email(&req.email).await? else {
        return Ok(Json(StatusResponse::failure("User does not exist")));
    };
    let user_id = user.id_string();

    let token = state
        .jwt_service
        .generate_reset_token(&user_id, user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;
    let expires_at = (Utc::now() + Duration::minutes(RESET_TOKEN_MINUTES)).timestamp_millis();
    repo.set_reset_token(&user_id, &token, expires_at).await?;

    if let Some(mailer) = &state.mailer {
        let link = format!(
            "{}/reset-password/{token}",
            state.config.frontend_url.trim_end_matches('/')
        );
        mailer
            .send_reset_email(&user.email, &user.name, &link)
            .await
            .map_err(|e| AppError::internal(format!("Failed to send reset email: {e}")))?;
    } else {
        tracing::warn!(user = user_id, "Mailer not configured, reset token stored only");
    }

    Ok(Json(StatusResponse::ok("Reset link sent to your email")))
}

/// POST /api/user/reset-password - 凭 token 重置密码
pub async fn reset_password(
    State(state): State<ServerState>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<StatusResponse>> {
    validate_password(&req.password)?;

    // The token is a signed reset-type JWT carrying the user id; the
    // stored copy plus expiry is checked again at the database so a
    // token is single-use.
    let Ok(user_id) = state.jwt_service.validate_reset_token(&req.token) else {
        return Ok(Json(StatusResponse::failure("Invalid or expired token")));
    };

    let hash = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let repo = UserRepository::new(state.db.clone());
    let applied = repo
        .reset_password(&user_id, &req.token, &hash, Utc::now().timestamp_millis())
        .await?;
    if !applied {
        return Ok(Json(StatusResponse::failure("Invalid or expired token")));
    }

    tracing::info!(user = user_id, "Password reset");
    Ok(Json(StatusResponse::ok("Password has been reset")))
}
