// src/api/client.rs

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::common::error::AppError;

// Shared HTTP handle for every remote operation. reqwest's Client is an Arc
// internally, so cloning this is cheap; one instance serves the whole
// process. No retries, no timeouts beyond the transport defaults, and no
// status-code classification anywhere in this layer.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    // Unauthenticated request (login only).
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    // Authenticated request: attaches `Authorization: Bearer <token>`.
    pub(crate) fn authed(&self, method: Method, path: &str, jwt: &str) -> RequestBuilder {
        self.request(method, path).bearer_auth(jwt)
    }

    // Checks the HTTP status and decodes the body. Payloads that do not
    // match the expected schema are rejected with `MalformedResponse`
    // instead of being silently defaulted field by field.
    pub(crate) async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        let response = response.error_for_status()?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AppError::MalformedResponse(e.to_string()))
    }

    // For endpoints whose response body we do not consume.
    pub(crate) async fn discard(response: Response) -> Result<(), AppError> {
        response.error_for_status()?;
        Ok(())
    }
}
