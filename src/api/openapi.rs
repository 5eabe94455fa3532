//! OpenAPI documentation configuration.
//!
//! Served at `/api-docs/openapi.json`, browsable under `/swagger-ui`.

use utoipa::OpenApi;

use crate::api::handlers::auth_handler;
use crate::domain::UserResponse;
use crate::types::{MessageResponse, RegisterResponse};

/// OpenAPI documentation for the account service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "account-service",
        version = "0.1.0",
        description = "User registration and login with salted password hashing",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
    ),
    components(
        schemas(
            UserResponse,
            MessageResponse,
            RegisterResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
        )
    ),
    tags(
        (name = "Authentication", description = "User registration and login")
    )
)]
pub struct ApiDoc;
