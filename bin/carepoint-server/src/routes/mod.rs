//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional OpenAPI document (disable with `CAREPOINT_ENABLE_DOCS=false`)
//! - Health route
//! - `/api` routes; everything but signup/signin sits behind [`require_bearer`]

mod auth;
pub mod doc;
mod generate;
mod health;
mod history;
mod hospital;

use axum::{middleware, Router};
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::middleware::auth::require_bearer;
use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(generate::router())
        .merge(hospital::router())
        .merge(history::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let api = Router::new().merge(auth::router()).merge(protected);

    let mut app = Router::new()
        .merge(health::router())
        .nest("/api", api);

    if state.config.enable_docs {
        app = app.merge(doc::router());
    }

    app
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(&state)))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-process app with an in-memory database for handler tests.

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::entities::Store;
    use crate::state::AppState;
    use crate::upstream::Upstreams;

    /// Nothing listens here, so an unconfigured upstream fails fast.
    const NOWHERE: &str = "http://127.0.0.1:9";

    /// App with test keys, a cheap bcrypt cost and upstreams pointing nowhere.
    /// `tweak` adjusts the config before the app is built.
    pub async fn test_app(tweak: impl FnOnce(&mut Config)) -> (Router, Arc<AppState>) {
        let mut cfg = Config::from_lookup(|_| None);
        cfg.jwt_secret = Some("test-secret".into());
        cfg.bcrypt_cost = 4;
        cfg.gemini_api_key = Some("test-gemini-key".into());
        cfg.maps_api_key = Some("test-maps-key".into());
        cfg.gemini_base_url = NOWHERE.into();
        cfg.maps_base_url = NOWHERE.into();
        cfg.fda_base_url = NOWHERE.into();
        tweak(&mut cfg);

        let upstream = Upstreams::from_config(&cfg).unwrap();
        let state = Arc::new(AppState::new(cfg, Store::in_memory().await, upstream));
        (super::build(state.clone()), state)
    }

    pub async fn call(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, request(method, uri).body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn call_with_token(
        app: &Router,
        method: Method,
        uri: &str,
        body: Value,
        token: &str,
    ) -> (StatusCode, Value) {
        let req = request(method, uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, req).await
    }

    /// A `generateContent` reply whose first candidate says `text`.
    pub fn gemini_reply(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }] })
    }

    fn request(method: Method, uri: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }
}
