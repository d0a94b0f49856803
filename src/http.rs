//! Shared HTTP client for the travel-search APIs.
//!
//! One [`ApiClient`] is built per run and read-shared across all cooperative
//! fetch tasks; it only issues independent GET requests, no response state is
//! shared. Credentials are attached as RapidAPI-style key/host headers.

use crate::config::Credentials;
use crate::error::{Error, Result};
use std::time::Duration;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-rapidapi-key";
/// Header naming the API host the key is scoped to
const API_HOST_HEADER: &str = "x-rapidapi-host";

/// Credentialed JSON-over-GET client with a per-request timeout.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    credentials: Credentials,
}

impl ApiClient {
    /// Build a client with the given credentials and per-request timeout
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            credentials,
        })
    }

    /// GET `url` with the given query parameters and decode the JSON body.
    ///
    /// A non-success status is reported as [`Error::Fetch`] naming the URL, so
    /// callers inside a pipeline can isolate it per item.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .header(API_HOST_HEADER, &self.credentials.api_host)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP {}", status.as_u16())));
        }

        Ok(response.json().await?)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> ApiClient {
        ApiClient::new(
            Credentials::new("test-key", "api.example.com"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn get_json_sends_credential_headers_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(header("x-rapidapi-key", "test-key"))
            .and(header("x-rapidapi-host", "api.example.com"))
            .and(query_param("q", "roma"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"id": 1}]
            })))
            .mount(&server)
            .await;

        let payload = client()
            .get_json(
                &format!("{}/v1/search", server.uri()),
                &[("q", "roma".to_string())],
            )
            .await
            .unwrap();

        assert_eq!(payload["data"][0]["id"], 1);
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client().get_json(&server.uri(), &[]).await.unwrap_err();
        match err {
            Error::Fetch { reason, .. } => assert_eq!(reason, "HTTP 429"),
            other => panic!("expected Fetch error, got {other}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_body_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client().get_json(&server.uri(), &[]).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
