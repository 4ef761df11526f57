// src/api/auth_api.rs

use reqwest::Method;

use crate::{
    api::client::ApiClient,
    common::error::AppError,
    models::auth::{AuthResponse, LoginPayload},
};

#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // POST /auth/login-user. The only unauthenticated call in the client.
    pub async fn login(&self, credentials: &LoginPayload) -> Result<AuthResponse, AppError> {
        let response = self
            .client
            .request(Method::POST, "/auth/login-user")
            .json(credentials)
            .send()
            .await?;
        ApiClient::parse(response).await
    }
}
