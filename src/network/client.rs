//! HTTP client wrapper - shared request instance bound to the backend base URL

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Describe a transport error the way it is shown to users
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timed out: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_decode() {
        format!("Unexpected response shape: {}", e)
    } else if let Some(status) = e.status() {
        format!("Server responded {}", status)
    } else {
        format!("Request failed: {}", e)
    }
}

/// Client for the chat backend. Cloning shares the underlying connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(create_client(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an absolute API path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` with query parameters and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!(describe_error(&e)))
            .with_context(|| format!("GET {}", url))?;
        read_json(resp).await.with_context(|| format!("GET {}", url))
    }

    /// POST a multipart form to `path` and decode the JSON body
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, "POST multipart");
        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!(describe_error(&e)))
            .with_context(|| format!("POST {}", url))?;
        read_json(resp).await.with_context(|| format!("POST {}", url))
    }
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let resp = resp
        .error_for_status()
        .map_err(|e| anyhow::anyhow!(describe_error(&e)))?;
    let body = resp
        .text()
        .await
        .map_err(|e| anyhow::anyhow!(describe_error(&e)))?;
    serde_json::from_str(&body).context("Unexpected response shape")
}

/// Create an HTTP client with default configuration. No timeout override.
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("chatdesk/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_backend;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};

    #[test]
    fn test_url_join() {
        let api = ApiClient::new("http://localhost:5000/");
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(api.url("/api/Users/search"), "http://localhost:5000/api/Users/search");
        assert_eq!(api.url("api/Groups"), "http://localhost:5000/api/Groups");
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let app = Router::new().route("/boom", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
        let api = ApiClient::new(spawn_backend(app).await);
        let err = api.get_json::<Value>("/boom", &[]).await.unwrap_err();
        assert!(format!("{:#}", err).contains("500"));
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_error() {
        let app = Router::new().route("/list", get(|| async { Json(json!({"not": "a list"})) }));
        let api = ApiClient::new(spawn_backend(app).await);
        assert!(api.get_json::<Vec<Value>>("/list", &[]).await.is_err());
    }
}
