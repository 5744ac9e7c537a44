// src/core/service_client.rs
//! Shared HTTP plumbing for the backend API: bearer auth, JSON bodies, and
//! mapping of failures onto [`ApiError`].

use anyhow::Context;
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{error, info, trace};

use crate::error::ApiError;
use crate::types::response::ErrorBody;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ServiceClient {
    /// Create new service client with configuration
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> anyhow::Result<Self> {
        let timeout = if timeout_seconds == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_seconds
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Generic GET request
    pub async fn get<R>(&self, endpoint: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        self.send(self.request(Method::GET, endpoint)?, endpoint)
            .await
    }

    /// GET on an endpoint that needs no sign-in; the token is still sent when present.
    pub async fn get_public<R>(&self, endpoint: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let mut request = self.client.get(self.url(endpoint));
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }
        self.send(request, endpoint).await
    }

    /// Generic POST request with JSON
    pub async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.request(Method::POST, endpoint)?.json(payload);
        self.send(request, endpoint).await
    }

    pub async fn put_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.request(Method::PUT, endpoint)?.json(payload);
        self.send(request, endpoint).await
    }

    pub async fn patch_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.request(Method::PATCH, endpoint)?.json(payload);
        self.send(request, endpoint).await
    }

    pub async fn delete<R>(&self, endpoint: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        self.send(self.request(Method::DELETE, endpoint)?, endpoint)
            .await
    }

    fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or_else(|| {
            ApiError::validation("Not signed in: set CAREERS_TOKEN or `token` in the config file")
        })?;

        Ok(self
            .client
            .request(method, self.url(endpoint))
            .bearer_auth(token))
    }

    async fn send<R>(&self, request: RequestBuilder, endpoint: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        info!("Calling backend: {}", url);

        let response = request.send().await.map_err(|source| {
            error!("Request to {} failed: {}", url, source);
            ApiError::Network {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        trace!("Response status: {}", status);

        if status.is_success() {
            Self::decode(response, &url).await
        } else {
            let message = Self::error_message(response).await;
            error!("Backend error {} from {}: {}", status, url, message);
            Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn decode<R>(response: Response, url: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let body = response.text().await.map_err(|source| ApiError::Network {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn error_message(response: Response) -> String {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        parse_error_message(&text)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
    }
}

/// Pull `message` out of a backend error body, if there is one.
pub fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ServiceClient::new("http://localhost:3000/api/", 5).unwrap();
        assert_eq!(
            client.url("/employer/jobs"),
            "http://localhost:3000/api/employer/jobs"
        );
    }

    #[test]
    fn test_blank_token_counts_as_signed_out() {
        let client = ServiceClient::new("http://localhost:3000/api", 5)
            .unwrap()
            .with_token(Some("   ".to_string()));
        assert!(!client.has_token());
        assert!(matches!(
            client.request(Method::GET, "/employer/jobs"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_error_message() {
        assert_eq!(
            parse_error_message(r#"{"message": "Invalid application ID"}"#),
            Some("Invalid application ID".to_string())
        );
        assert_eq!(parse_error_message(r#"{"error": "nope"}"#), None);
        assert_eq!(parse_error_message("<html>502</html>"), None);
    }
}
