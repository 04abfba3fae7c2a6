//! Per-user interaction history: list, clear, delete one.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{delete, post};
use axum::{Extension, Json, Router};
use tracing::info;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::entities::InteractionStore;
use crate::error::ServerError;
use crate::extract::ValidatedJson;
use crate::middleware::auth::Caller;
use crate::schemas::history::{
    DeleteHistoryRequest, DeleteHistoryResponse, DeleteOneResponse, HistoryEntry, HistoryRequest,
    HistoryResponse,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_history, clear_history, delete_entry),
    components(schemas(
        HistoryRequest,
        DeleteHistoryRequest,
        HistoryEntry,
        HistoryResponse,
        DeleteHistoryResponse,
        DeleteOneResponse
    ))
)]
pub struct HistoryApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/history", post(list_history).delete(clear_history))
        .route("/history/{id}", delete(delete_entry))
}

/// The user's interactions, newest first.
#[utoipa::path(
    post,
    path = "/api/history",
    tag = "history",
    request_body = HistoryRequest,
    responses(
        (status = 200, description = "Stored interactions", body = HistoryResponse),
        (status = 400, description = "Username missing"),
    )
)]
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(req): ValidatedJson<HistoryRequest>,
) -> Result<Json<HistoryResponse>, ServerError> {
    caller.ensure_owner(&req.username)?;
    let rows = state.store.list_interactions(&req.username, req.limit).await?;
    Ok(Json(HistoryResponse {
        messages: rows.iter().map(|i| i.to_response()).collect(),
    }))
}

/// Delete every interaction of the user.
#[utoipa::path(
    delete,
    path = "/api/history",
    tag = "history",
    request_body = DeleteHistoryRequest,
    responses(
        (status = 200, description = "Number of interactions removed", body = DeleteHistoryResponse),
        (status = 400, description = "Username missing"),
    )
)]
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(req): ValidatedJson<DeleteHistoryRequest>,
) -> Result<Json<DeleteHistoryResponse>, ServerError> {
    caller.ensure_owner(&req.username)?;
    let deleted_count = state.store.delete_user_interactions(&req.username).await?;
    info!(username = %req.username, deleted_count, "history cleared");
    Ok(Json(DeleteHistoryResponse { deleted_count }))
}

/// Delete one interaction, only if it belongs to the named user.
#[utoipa::path(
    delete,
    path = "/api/history/{id}",
    tag = "history",
    params(("id" = String, Path, description = "Interaction id")),
    request_body = DeleteHistoryRequest,
    responses(
        (status = 200, description = "Deleted", body = DeleteOneResponse),
        (status = 400, description = "Malformed id or username missing"),
        (status = 404, description = "No such interaction for this user"),
    )
)]
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<DeleteHistoryRequest>,
) -> Result<Json<DeleteOneResponse>, ServerError> {
    let id = Uuid::parse_str(&id).map_err(|_| ServerError::BadRequest("Invalid ID format".into()))?;
    caller.ensure_owner(&req.username)?;

    if !state.store.delete_interaction(id, &req.username).await? {
        return Err(ServerError::NotFound(
            "Message not found or not authorized".into(),
        ));
    }
    info!(%id, username = %req.username, "history entry deleted");
    Ok(Json(DeleteOneResponse { success: true }))
}

#[cfg(test)]
mod test {
    use super::super::test_support::{call, call_with_token, test_app};
    use super::*;
    use crate::entities::interaction::DEFAULT_COLLECTION;
    use crate::entities::Interaction;
    use axum::http::{Method, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::json;

    async fn seed(state: &AppState, username: &str, prompt: &str, age_secs: i64) -> Uuid {
        let record = Interaction {
            id: Uuid::new_v4(),
            username: username.into(),
            collection: DEFAULT_COLLECTION.into(),
            prompt: prompt.into(),
            response: "Most Likely Condition: Cold".into(),
            category: "General".into(),
            urgency_score: "2".into(),
            condition: "Cold".into(),
            created_at: Utc::now() - Duration::seconds(age_secs),
        };
        let id = record.id;
        state.store.insert_interaction(record).await.unwrap();
        id
    }

    #[tokio::test]
    async fn list_returns_only_the_users_entries_newest_first() {
        let (app, state) = test_app(|_| {}).await;
        let old = seed(&state, "ann", "first", 30).await;
        seed(&state, "ann", "second", 10).await;
        seed(&state, "bob", "not mine", 5).await;

        let (status, body) = call(&app, Method::POST, "/api/history", json!({ "username": "ann" })).await;
        assert_eq!(status, StatusCode::OK);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["prompt"], "second");
        assert_eq!(messages[1]["_id"], old.to_string());
        assert_eq!(messages[1]["urgencyScore"], "2");
        assert!(messages[1]["timestamp"].is_string());

        let (_, body) = call(
            &app,
            Method::POST,
            "/api/history",
            json!({ "username": "ann", "limit": 1 }),
        )
        .await;
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_requires_a_username() {
        let (app, _) = test_app(|_| {}).await;
        let (status, body) = call(&app, Method::POST, "/api/history", json!({ "username": " " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn clear_reports_the_deleted_count() {
        let (app, state) = test_app(|_| {}).await;
        seed(&state, "ann", "a", 2).await;
        seed(&state, "ann", "b", 1).await;
        seed(&state, "bob", "c", 1).await;

        let (status, body) =
            call(&app, Method::DELETE, "/api/history", json!({ "username": "ann" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deletedCount"], 2);

        let (_, body) = call(&app, Method::DELETE, "/api/history", json!({ "username": "ann" })).await;
        assert_eq!(body["deletedCount"], 0);
        assert_eq!(state.store.list_interactions("bob", None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_one_checks_id_and_owner() {
        let (app, state) = test_app(|_| {}).await;
        let id = seed(&state, "ann", "mine", 1).await;
        let uri = format!("/api/history/{id}");

        let (status, body) =
            call(&app, Method::DELETE, "/api/history/not-a-uuid", json!({ "username": "ann" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid ID format");

        let (status, body) = call(&app, Method::DELETE, &uri, json!({ "username": "bob" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Message not found or not authorized");
        assert_eq!(state.store.list_interactions("ann", None).await.unwrap().len(), 1);

        let (status, body) = call(&app, Method::DELETE, &uri, json!({ "username": "ann" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _) = call(&app, Method::DELETE, &uri, json!({ "username": "ann" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn enforced_auth_scopes_history_to_the_token_subject() {
        let (app, state) = test_app(|cfg| cfg.require_auth = true).await;
        seed(&state, "ann@example.com", "mine", 1).await;
        let token = crate::auth::issue_token(&state.config, "ann@example.com").unwrap();

        let (status, body) = call_with_token(
            &app,
            Method::POST,
            "/api/history",
            json!({ "username": "ann@example.com" }),
            &token,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);

        let (status, _) = call_with_token(
            &app,
            Method::DELETE,
            "/api/history",
            json!({ "username": "bob@example.com" }),
            &token,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            call_with_token(&app, Method::POST, "/api/history", json!({ "username": "ann@example.com" }), "garbage")
                .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
