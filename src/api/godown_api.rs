// src/api/godown_api.rs

use reqwest::Method;
use serde::Serialize;

use crate::{
    api::{
        client::ApiClient,
        wire::{Envelope, WireGodown},
    },
    common::error::AppError,
    models::catalog::Godown,
};

#[derive(Debug, Serialize)]
struct GodownWrite<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct GodownApi {
    client: ApiClient,
}

impl GodownApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, jwt: &str) -> Result<Vec<Godown>, AppError> {
        let response = self.client.authed(Method::GET, "/godown", jwt).send().await?;
        let envelope: Envelope<Vec<WireGodown>> = ApiClient::parse(response).await?;
        Ok(envelope.data.into_iter().map(Godown::from).collect())
    }

    pub async fn create(
        &self,
        jwt: &str,
        name: &str,
        location: Option<&str>,
    ) -> Result<Godown, AppError> {
        let body = GodownWrite { name, location };
        let response = self
            .client
            .authed(Method::POST, "/godown", jwt)
            .json(&body)
            .send()
            .await?;
        let envelope: Envelope<WireGodown> = ApiClient::parse(response).await?;
        Ok(envelope.data.into())
    }

    pub async fn update(
        &self,
        jwt: &str,
        godown_id: i64,
        name: &str,
        location: Option<&str>,
    ) -> Result<Godown, AppError> {
        let body = GodownWrite { name, location };
        let path = format!("/godown/{godown_id}");
        let response = self
            .client
            .authed(Method::PUT, &path, jwt)
            .json(&body)
            .send()
            .await?;
        let envelope: Envelope<WireGodown> = ApiClient::parse(response).await?;
        Ok(envelope.data.into())
    }
}
