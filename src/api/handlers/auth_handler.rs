//! Registration and login handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{MSG_LOGIN_SUCCESSFUL, MSG_USER_REGISTERED};
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse, RegisterResponse};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Alice")]
    pub name: String,
    /// User email address
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "a@x.com")]
    pub email: String,
    /// User password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret")]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "a@x.com")]
    pub email: String,
    /// User password
    #[schema(example = "secret")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Invalid input or user already exists", body = MessageResponse),
        (status = 500, description = "Server error", body = String, content_type = "text/plain")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<RegisterResponse>> {
    let user = state
        .auth_service
        .register(payload.name, payload.email, payload.password)
        .await?;

    Ok(Created(RegisterResponse {
        msg: MSG_USER_REGISTERED.to_string(),
        user: UserResponse::from(user),
    }))
}

/// Check credentials
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = MessageResponse),
        (status = 400, description = "User not found or invalid credentials", body = MessageResponse),
        (status = 500, description = "Server error", body = String, content_type = "text/plain")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(MessageResponse::new(MSG_LOGIN_SUCCESSFUL)))
}
