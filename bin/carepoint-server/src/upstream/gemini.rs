//! Gemini `generateContent` client.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{read_json, trim_base, UpstreamError};
use crate::config::Config;

const SERVICE: &str = "Gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    structured: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, cfg: &Config) -> Self {
        Self {
            http,
            api_key: cfg.gemini_api_key.clone(),
            model: cfg.gemini_model.clone(),
            base_url: trim_base(&cfg.gemini_base_url),
            structured: cfg.structured_replies,
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        if self.structured {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": carepoint_triage::reply::response_schema(),
            });
        }
        body
    }

    /// Send `prompt` and return the first candidate's text, if any.
    pub async fn generate(&self, prompt: &str) -> Result<Option<String>, UpstreamError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingKey { service: SERVICE })?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!(model = %self.model, prompt_len = prompt.len(), structured = self.structured, "calling model");

        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(UpstreamError::transport(SERVICE))?;

        let parsed: GenerateResponse = read_json(SERVICE, resp).await?;
        Ok(parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::upstream::test_support;
    use axum::extract::Query;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::collections::HashMap;

    fn client(base_url: String, key: Option<&str>) -> GeminiClient {
        let mut cfg = Config::from_lookup(|_| None);
        cfg.gemini_base_url = base_url;
        cfg.gemini_api_key = key.map(str::to_owned);
        GeminiClient::new(reqwest::Client::new(), &cfg)
    }

    #[tokio::test]
    async fn returns_first_candidate_text() {
        let router = Router::new().route(
            "/v1beta/models/{model}",
            post(|headers: HeaderMap, Query(q): Query<HashMap<String, String>>, Json(body): Json<Value>| async move {
                assert_eq!(headers[API_KEY_HEADER], "secret");
                assert!(!q.contains_key("key"));
                assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
                Json(json!({
                    "candidates": [{ "content": { "parts": [{ "text": "Urgency Score (1–10): 2" }] } }]
                }))
            }),
        );
        let base = test_support::spawn(router).await;
        let text = client(base, Some("secret")).generate("hi").await.unwrap();
        assert_eq!(text.as_deref(), Some("Urgency Score (1–10): 2"));
    }

    #[tokio::test]
    async fn empty_candidates_yield_none() {
        let router = Router::new().route(
            "/v1beta/models/{model}",
            post(|| async { Json(json!({ "candidates": [] })) }),
        );
        let base = test_support::spawn(router).await;
        assert_eq!(client(base, Some("k")).generate("hi").await.unwrap(), None);
    }

    #[tokio::test]
    async fn failure_status_carries_body() {
        let router = Router::new().route(
            "/v1beta/models/{model}",
            post(|| async {
                (
                    axum::http::StatusCode::BAD_REQUEST,
                    Json(json!({ "error": { "message": "API key not valid" } })),
                )
            }),
        );
        let base = test_support::spawn(router).await;
        match client(base, Some("k")).generate("hi").await {
            Err(UpstreamError::Status { status, body, .. }) => {
                assert_eq!(status, 400);
                assert_eq!(body["error"]["message"], "API key not valid");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_fails_without_calling_out() {
        let err = client("http://127.0.0.1:9".into(), None)
            .generate("hi")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::MissingKey { service: "Gemini" }));
    }

    #[tokio::test]
    async fn transport_failure_does_not_reveal_the_key() {
        let err = client("http://127.0.0.1:9".into(), Some("SUPER-SECRET-KEY"))
            .generate("hi")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Transport { .. }));
        let mut shown = format!("{err} {err:?}");
        shown.push_str(&crate::error::ServerError::from(err).to_string());
        assert!(!shown.contains("SUPER-SECRET-KEY"), "{shown}");
    }
}
