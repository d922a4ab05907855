//! User management handlers. Admin only; there is no self-registration.

use actix_web::{HttpResponse, web};

use hygge_core::domain::Role;
use hygge_core::error::ValidationErrors;
use hygge_core::ports::{NewUser, PasswordService, UserRepository, UserUpdate};
use hygge_shared::dto::{StoreUserRequest, UpdateUserRequest, UserResponse};
use hygge_shared::{DataResponse, MessageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/users
pub async fn index(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    require_admin(&identity)?;

    let users = state.users.list().await?;

    let data: Vec<UserResponse> = users
        .into_iter()
        .map(|user| UserResponse::from_user(user, true))
        .collect();
    Ok(HttpResponse::Ok().json(DataResponse::new(data)))
}

/// POST /api/v1/users
pub async fn store(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<StoreUserRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let req = body.into_inner();

    let mut errors = ValidationErrors::new();
    check_name(&mut errors, &req.name);
    check_email(&mut errors, &req.email);
    check_password(&mut errors, &req.password);
    let role = parse_role(&mut errors, &req.role);

    if state.users.find_by_email(&req.email).await?.is_some() {
        errors.add("email", "The email has already been taken.");
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    let role = role.expect("role validated above");

    let password_hash = state.passwords.hash(&req.password)?;
    let user = state
        .users
        .create(NewUser {
            name: req.name,
            email: req.email,
            password_hash,
            bio: req.bio,
            role,
        })
        .await?;
    tracing::info!(user_id = user.id, "user created");

    Ok(HttpResponse::Created().json(DataResponse::new(UserResponse::from_user(user, true))))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let id = path.into_inner();
    let req = body.into_inner();

    let current = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let mut errors = ValidationErrors::new();
    if let Some(name) = &req.name {
        check_name(&mut errors, name);
    }
    if let Some(email) = &req.email {
        check_email(&mut errors, email);
        if email != &current.email && state.users.find_by_email(email).await?.is_some() {
            errors.add("email", "The email has already been taken.");
        }
    }
    if let Some(password) = &req.password {
        check_password(&mut errors, password);
    }
    let role = match &req.role {
        Some(raw) => parse_role(&mut errors, raw),
        None => None,
    };
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let password_hash = match req.password {
        Some(password) => Some(state.passwords.hash(&password)?),
        None => None,
    };

    let user = state
        .users
        .update(
            id,
            UserUpdate {
                name: req.name,
                email: req.email,
                password_hash,
                bio: req.bio,
                role,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(DataResponse::new(UserResponse::from_user(user, true))))
}

/// DELETE /api/v1/users/{id} - admins cannot delete themselves.
pub async fn destroy(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let id = path.into_inner();

    if id == identity.user_id {
        return Err(AppError::Forbidden);
    }

    state.users.delete(id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully.")))
}

fn require_admin(identity: &Identity) -> Result<(), AppError> {
    if identity.has_role("admin") {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn check_name(errors: &mut ValidationErrors, name: &str) {
    if name.trim().is_empty() {
        errors.add("name", "The name field is required.");
    } else if name.chars().count() > 255 {
        errors.add("name", "The name may not be greater than 255 characters.");
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.trim().is_empty() || !email.contains('@') {
        errors.add("email", "The email must be a valid email address.");
    } else if email.chars().count() > 255 {
        errors.add("email", "The email may not be greater than 255 characters.");
    }
}

fn check_password(errors: &mut ValidationErrors, password: &str) {
    if password.chars().count() < 8 {
        errors.add("password", "The password must be at least 8 characters.");
    }
}

fn parse_role(errors: &mut ValidationErrors, raw: &str) -> Option<Role> {
    match raw.parse() {
        Ok(role) => Some(role),
        Err(_) => {
            errors.add("role", "The selected role is invalid.");
            None
        }
    }
}
