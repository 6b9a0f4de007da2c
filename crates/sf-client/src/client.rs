//! Core HTTP client.
//!
//! Requests are sent exactly once. A hang blocks the caller until the
//! configured timeout fires.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::RequestBuilder;
use crate::response::Response;

/// HTTP client for Salesforce APIs.
#[derive(Debug, Clone)]
pub struct SfHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl SfHttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(url)
    }

    /// Execute a request. Non-success statuses are returned as responses,
    /// not errors; only transport failures produce `Err`.
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let mut req = self.inner.get(&request.url);

        if let Some(ref token) = request.bearer_token {
            req = req.bearer_auth(token);
        }

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if !request.query_params.is_empty() {
            req = req.query(&request.query_params);
        }

        if self.config.enable_tracing {
            debug!(url = %request.url, "Sending request");
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(Response::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_successful_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::new(ClientConfig::default()).unwrap();

        let response = client
            .execute(client.get(format!("{}/test", mock_server.uri())).bearer_auth("test-token"))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_query_params_are_encoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("explain", "SELECT Id FROM Account WHERE Name = 'A&B'"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::new(ClientConfig::default()).unwrap();
        let response = client
            .execute(
                client
                    .get(format!("{}/query", mock_server.uri()))
                    .query("explain", "SELECT Id FROM Account WHERE Name = 'A&B'"),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_error_status_is_not_an_err() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/error"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad query"))
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::new(ClientConfig::default()).unwrap();
        let response = client
            .execute(client.get(format!("{}/error", mock_server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        assert_eq!(response.text().await.unwrap(), "bad query");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = SfHttpClient::new(ClientConfig::default()).unwrap();
        // Port 9 (discard) is essentially never listening on test hosts.
        let result = client.execute(client.get("http://127.0.0.1:9/nothing")).await;

        let err = result.unwrap_err();
        assert!(matches!(
            err.kind,
            ErrorKind::Connection(_) | ErrorKind::Other(_) | ErrorKind::Timeout
        ));
    }
}
