use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Body of `POST /api/auth/signup` and `POST /api/auth/signin`.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SigninResponse {
    pub success: bool,
    /// HS256 bearer token; its subject is the user's email.
    pub token: String,
}
