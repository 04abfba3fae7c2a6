use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::routes::auth::AuthApi;
use crate::routes::generate::GenerateApi;
use crate::routes::health::HealthApi;
use crate::routes::history::HistoryApi;
use crate::routes::hospital::HospitalApi;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(info(
    title = "carepoint-server",
    description = "Symptom triage, nearby hospitals and consultation history",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(HealthApi::openapi());
    root.merge(AuthApi::openapi());
    root.merge(GenerateApi::openapi());
    root.merge(HospitalApi::openapi());
    root.merge(HistoryApi::openapi());
    root
}

/// Serves the document at `/api-docs/openapi.json`.
pub fn router() -> Router<Arc<AppState>> {
    let doc = get_docs();
    Router::new().route(
        "/api-docs/openapi.json",
        get(move || {
            let doc = doc.clone();
            async move { Json(doc) }
        }),
    )
}

#[cfg(test)]
mod test {
    use super::super::test_support::test_app;
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn document_lists_every_route() {
        let doc = get_docs();
        for path in [
            "/health",
            "/api/auth/signup",
            "/api/auth/signin",
            "/api/generate",
            "/api/nearbyHospital",
            "/api/history",
            "/api/history/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[tokio::test]
    async fn document_route_follows_the_toggle() {
        let get = || Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap();

        let (app, _) = test_app(|_| {}).await;
        assert_eq!(app.oneshot(get()).await.unwrap().status(), StatusCode::OK);

        let (app, _) = test_app(|cfg| cfg.enable_docs = false).await;
        assert_eq!(app.oneshot(get()).await.unwrap().status(), StatusCode::NOT_FOUND);
    }
}
