// src/api/category_api.rs

use reqwest::Method;
use serde::Serialize;

use crate::{
    api::{
        client::ApiClient,
        wire::{Envelope, WireCategory},
    },
    common::error::AppError,
    models::catalog::Category,
};

#[derive(Debug, Serialize)]
struct CategoryWrite<'a> {
    name: &'a str,
    #[serde(rename = "imageId", skip_serializing_if = "Option::is_none")]
    image_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct CategoryApi {
    client: ApiClient,
}

impl CategoryApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // GET /categories, optionally narrowed to one godown. Proxies between
    // the client and the backend are told not to cache this list; a stale
    // category set breaks the product form's multi-select.
    pub async fn list(&self, jwt: &str, godown_id: Option<i64>) -> Result<Vec<Category>, AppError> {
        let mut request = self
            .client
            .authed(Method::GET, "/categories", jwt)
            .header("Cache-Control", "no-cache, no-store, must-revalidate")
            .header("Pragma", "no-cache")
            .header("Expires", "0");
        if let Some(godown_id) = godown_id {
            request = request.query(&[("godown", godown_id.to_string())]);
        }

        let envelope: Envelope<Vec<WireCategory>> =
            ApiClient::parse(request.send().await?).await?;
        Ok(envelope.data.into_iter().map(Category::from).collect())
    }

    pub async fn create(
        &self,
        jwt: &str,
        name: &str,
        image_id: Option<i64>,
    ) -> Result<Category, AppError> {
        let body = CategoryWrite { name, image_id };
        let response = self
            .client
            .authed(Method::POST, "/categories", jwt)
            .json(&body)
            .send()
            .await?;
        let envelope: Envelope<WireCategory> = ApiClient::parse(response).await?;
        Ok(envelope.data.into())
    }

    pub async fn update(
        &self,
        jwt: &str,
        category_id: i64,
        name: &str,
        image_id: Option<i64>,
    ) -> Result<Category, AppError> {
        let body = CategoryWrite { name, image_id };
        let path = format!("/categories/{category_id}");
        let response = self
            .client
            .authed(Method::PUT, &path, jwt)
            .json(&body)
            .send()
            .await?;
        let envelope: Envelope<WireCategory> = ApiClient::parse(response).await?;
        Ok(envelope.data.into())
    }
}
