//! Authentication handlers.

use actix_web::{HttpResponse, web};

use hygge_core::error::ValidationErrors;
use hygge_core::ports::{PasswordService, TokenService, UserRepository, UserUpdate};
use hygge_shared::dto::{AuthResponse, ChangePasswordRequest, LoginRequest, UserResponse};
use hygge_shared::{DataResponse, MessageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state.users.find_by_email(&req.email).await?;

    // A missing account and a wrong password produce the same error.
    let valid = match &user {
        Some(user) => state.passwords.verify(&req.password, &user.password_hash)?,
        None => false,
    };
    let Some(user) = user.filter(|_| valid) else {
        return Err(AppError::Validation(ValidationErrors::single(
            "email",
            "The provided credentials are incorrect.",
        )));
    };

    let roles = user.roles.iter().map(ToString::to_string).collect();
    let token = state.tokens.generate_token(user.id, &user.email, roles)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds() as u64,
        user: UserResponse::from_user(user, true),
    }))
}

/// GET /api/v1/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(DataResponse::new(UserResponse::from_user(user, true))))
}

/// POST /api/v1/logout
///
/// Tokens are stateless, so there is nothing to revoke server-side;
/// the client discards its copy.
pub async fn logout(identity: Identity) -> AppResult<HttpResponse> {
    tracing::debug!(user_id = identity.user_id, "logout");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Logged out successfully.")))
}

/// POST /api/v1/change-password
pub async fn change_password(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let mut errors = ValidationErrors::new();
    if !state
        .passwords
        .verify(&req.current_password, &user.password_hash)?
    {
        errors.add("current_password", "The current password is incorrect.");
    }
    if req.new_password.chars().count() < 8 {
        errors.add("new_password", "The new password must be at least 8 characters.");
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let password_hash = state.passwords.hash(&req.new_password)?;
    state
        .users
        .update(
            user.id,
            UserUpdate {
                password_hash: Some(password_hash),
                ..Default::default()
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Password changed successfully.")))
}
