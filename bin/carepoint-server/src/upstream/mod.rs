//! Clients for the third-party APIs the service depends on.
//!
//! Each client owns a clone of one shared [`reqwest::Client`] and the base
//! URL and key it needs from [`Config`]. Base URLs are configurable so tests
//! can point the clients at a local stand-in server. Calls are made once;
//! nothing here retries.

pub mod fda;
pub mod gemini;
pub mod maps;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

pub use fda::DrugLabelClient;
pub use gemini::GeminiClient;
pub use maps::MapsClient;

/// Failure talking to an upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The API key for this service is not configured.
    #[error("{service} API key missing")]
    MissingKey { service: &'static str },

    /// The request never produced a response.
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a failure; `body` is what it sent back.
    #[error("{service} returned status {status}")]
    Status {
        service: &'static str,
        status: u16,
        body: Value,
    },

    /// A success response whose body did not have the expected shape.
    #[error("{service} response could not be decoded: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    pub fn service(&self) -> &'static str {
        match self {
            UpstreamError::MissingKey { service }
            | UpstreamError::Transport { service, .. }
            | UpstreamError::Status { service, .. }
            | UpstreamError::Decode { service, .. } => service,
        }
    }

    /// Wrap a send failure. The request URL is dropped from the error since
    /// some services take their key as a query parameter.
    pub(crate) fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| UpstreamError::Transport {
            service,
            source: source.without_url(),
        }
    }
}

/// The three upstream clients, sharing one connection pool.
#[derive(Debug, Clone)]
pub struct Upstreams {
    pub gemini: GeminiClient,
    pub maps: MapsClient,
    pub fda: DrugLabelClient,
}

impl Upstreams {
    pub fn from_config(cfg: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("carepoint-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            gemini: GeminiClient::new(http.clone(), cfg),
            maps: MapsClient::new(http.clone(), cfg),
            fda: DrugLabelClient::new(http, cfg),
        })
    }
}

/// Decode a success body as `T`, or turn a failure status into
/// [`UpstreamError::Status`] carrying the upstream body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    resp: reqwest::Response,
) -> Result<T, UpstreamError> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
            body,
        });
    }
    resp.json::<T>()
        .await
        .map_err(|source| UpstreamError::Decode {
            service,
            source: source.without_url(),
        })
}

pub(crate) fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_owned()
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A throwaway axum server standing in for an upstream API.

    use axum::Router;

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }
}
