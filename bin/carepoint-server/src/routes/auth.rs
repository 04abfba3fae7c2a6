//! Signup / signin.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;
use utoipa::OpenApi;

use crate::auth::{hash_password, issue_token, verify_password};
use crate::entities::{UserRecord, UserStore};
use crate::error::ServerError;
use crate::extract::ValidatedJson;
use crate::schemas::auth::{CredentialsRequest, SigninResponse, SignupResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(signup, signin),
    components(schemas(CredentialsRequest, SignupResponse, SigninResponse))
)]
pub struct AuthApi;

/// Register auth routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid input or email already registered"),
        (status = 500, description = "Server error"),
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> Result<Json<SignupResponse>, ServerError> {
    if state.store.find_user(&req.email).await?.is_some() {
        return Err(ServerError::BadRequest("User already exists".into()));
    }

    let password_hash = hash_password(req.password, state.config.bcrypt_cost).await?;
    let created = state
        .store
        .create_user(UserRecord {
            email: req.email.clone(),
            password_hash,
        })
        .await?;
    if !created {
        // Lost a race with a concurrent signup for the same email.
        return Err(ServerError::BadRequest("User already exists".into()));
    }

    info!(email = %req.email, "user registered");
    Ok(Json(SignupResponse { success: true }))
}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed token", body = SigninResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Server error"),
    )
)]
pub async fn signin(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> Result<Json<SigninResponse>, ServerError> {
    let user = state
        .store
        .find_user(&req.email)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".into()))?;

    if !verify_password(req.password, user.password_hash).await? {
        return Err(ServerError::Unauthorized("Invalid credentials".into()));
    }

    let token = issue_token(&state.config, &user.email)?;
    info!(email = %user.email, "user signed in");
    Ok(Json(SigninResponse { success: true, token }))
}

#[cfg(test)]
mod test {
    use super::super::test_support::{call, test_app};
    use crate::auth::verify_token;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn creds() -> serde_json::Value {
        json!({ "email": "ann@example.com", "password": "pw123" })
    }

    #[tokio::test]
    async fn signup_then_signin_issues_a_token() {
        let (app, state) = test_app(|_| {}).await;
        let (status, body) = call(&app, Method::POST, "/api/auth/signup", creds()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = call(&app, Method::POST, "/api/auth/signin", creds()).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap();
        assert_eq!(verify_token(&state.config, token).unwrap().sub, "ann@example.com");
    }

    #[tokio::test]
    async fn duplicate_signup_is_rejected() {
        let (app, _) = test_app(|_| {}).await;
        call(&app, Method::POST, "/api/auth/signup", creds()).await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/signup",
            json!({ "email": "ann@example.com", "password": "different" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User already exists");

        // The first password still works, so nothing was overwritten.
        let (status, _) = call(&app, Method::POST, "/api/auth/signin", creds()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user() {
        let (app, _) = test_app(|_| {}).await;
        call(&app, Method::POST, "/api/auth/signup", creds()).await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/signin",
            json!({ "email": "ann@example.com", "password": "nope" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/signin",
            json!({ "email": "bob@example.com", "password": "pw123" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn malformed_credentials_are_bad_requests() {
        let (app, _) = test_app(|_| {}).await;
        for body in [
            json!({ "email": "not-an-email", "password": "pw" }),
            json!({ "email": "ann@example.com", "password": "" }),
            json!({ "email": "ann@example.com" }),
        ] {
            let (status, reply) = call(&app, Method::POST, "/api/auth/signup", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(reply["error"].is_string());
        }
    }
}
