//! openFDA drug-label lookup.

use serde::Deserialize;
use tracing::debug;

use super::{read_json, trim_base, UpstreamError};
use crate::config::Config;
use crate::schemas::generate::DrugLabel;

const SERVICE: &str = "openFDA";

/// Longest section text kept from a label.
const SECTION_CHARS: usize = 1000;

#[derive(Debug, Clone)]
pub struct DrugLabelClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    #[serde(default)]
    results: Vec<LabelResult>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenFda {
    #[serde(default)]
    brand_name: Vec<String>,
    #[serde(default)]
    generic_name: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LabelResult {
    #[serde(default)]
    openfda: OpenFda,
    #[serde(default)]
    purpose: Vec<String>,
    #[serde(default)]
    indications_and_usage: Vec<String>,
    #[serde(default)]
    warnings: Vec<String>,
    #[serde(default)]
    dosage_and_administration: Vec<String>,
}

fn first_section(values: Vec<String>) -> Option<String> {
    let text = values.into_iter().next()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(match text.char_indices().nth(SECTION_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_owned(),
    })
}

impl From<LabelResult> for DrugLabel {
    fn from(r: LabelResult) -> Self {
        DrugLabel {
            brand_name: first_section(r.openfda.brand_name),
            generic_name: first_section(r.openfda.generic_name),
            purpose: first_section(r.purpose),
            indications_and_usage: first_section(r.indications_and_usage),
            warnings: first_section(r.warnings),
            dosage_and_administration: first_section(r.dosage_and_administration),
        }
    }
}

impl DrugLabelClient {
    pub fn new(http: reqwest::Client, cfg: &Config) -> Self {
        Self {
            http,
            base_url: trim_base(&cfg.fda_base_url),
        }
    }

    /// Label of the first product whose brand or generic name matches `term`.
    ///
    /// openFDA answers "no matches" with 404, which is `Ok(None)` here.
    pub async fn label(&self, term: &str) -> Result<Option<DrugLabel>, UpstreamError> {
        let term = term.replace('"', "");
        let search = format!(r#"openfda.brand_name:"{term}" openfda.generic_name:"{term}""#);
        let resp = self
            .http
            .get(format!("{}/drug/label.json", self.base_url))
            .query(&[("search", search.as_str()), ("limit", "1")])
            .send()
            .await
            .map_err(UpstreamError::transport(SERVICE))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(term = %term, "no drug label found");
            return Ok(None);
        }
        let parsed: LabelResponse = read_json(SERVICE, resp).await?;
        Ok(parsed.results.into_iter().next().map(DrugLabel::from))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::upstream::test_support;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn client(base_url: String) -> DrugLabelClient {
        let mut cfg = Config::from_lookup(|_| None);
        cfg.fda_base_url = base_url;
        DrugLabelClient::new(reqwest::Client::new(), &cfg)
    }

    #[tokio::test]
    async fn label_takes_first_entry_of_each_section() {
        let router = Router::new().route(
            "/drug/label.json",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(
                    q["search"],
                    r#"openfda.brand_name:"ibuprofen" openfda.generic_name:"ibuprofen""#
                );
                assert_eq!(q["limit"], "1");
                Json(json!({
                    "results": [{
                        "openfda": { "brand_name": ["Advil"], "generic_name": ["IBUPROFEN"] },
                        "purpose": ["Pain reliever/fever reducer"],
                        "warnings": ["", "second"],
                    }]
                }))
            }),
        );
        let base = test_support::spawn(router).await;
        let label = client(base).label("ibuprofen").await.unwrap().unwrap();
        assert_eq!(label.brand_name.as_deref(), Some("Advil"));
        assert_eq!(label.generic_name.as_deref(), Some("IBUPROFEN"));
        assert_eq!(label.purpose.as_deref(), Some("Pain reliever/fever reducer"));
        assert_eq!(label.warnings, None);
        assert_eq!(label.dosage_and_administration, None);
    }

    #[tokio::test]
    async fn not_found_is_no_label() {
        let router = Router::new().route(
            "/drug/label.json",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": { "code": "NOT_FOUND", "message": "No matches found!" } })),
                )
            }),
        );
        let base = test_support::spawn(router).await;
        assert_eq!(client(base).label("unobtainium").await.unwrap(), None);
    }

    #[tokio::test]
    async fn server_error_is_an_upstream_failure() {
        let router = Router::new().route(
            "/drug/label.json",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        );
        let base = test_support::spawn(router).await;
        match client(base).label("ibuprofen").await {
            Err(UpstreamError::Status { status, body, .. }) => {
                assert_eq!(status, 503);
                assert_eq!(body, json!("busy"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
