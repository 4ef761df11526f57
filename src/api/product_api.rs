// src/api/product_api.rs

use reqwest::Method;

use crate::{
    api::{
        client::ApiClient,
        wire::{Envelope, WireProduct},
    },
    common::error::AppError,
    models::catalog::{GodownDetach, InventoryUpdate, Product, ProductWrite},
};

// Optional server-side narrowing of GET /search/products. The dashboard
// fetches unfiltered and filters client-side, but the endpoint accepts all
// four parameters.
#[derive(Debug, Clone, Default)]
pub struct ProductSearchParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub godown_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ProductApi {
    client: ApiClient,
}

impl ProductApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn search(
        &self,
        jwt: &str,
        params: &ProductSearchParams,
    ) -> Result<Vec<Product>, AppError> {
        let mut request = self.client.authed(Method::GET, "/search/products", jwt);
        if let Some(name) = &params.name {
            request = request.query(&[("name", name.as_str())]);
        }
        if let Some(category) = &params.category {
            request = request.query(&[("category", category.as_str())]);
        }
        if let Some(brand) = &params.brand {
            request = request.query(&[("brand", brand.as_str())]);
        }
        if let Some(godown_id) = params.godown_id {
            request = request.query(&[("godownId", godown_id.to_string())]);
        }

        let envelope: Envelope<Vec<WireProduct>> =
            ApiClient::parse(request.send().await?).await?;
        Ok(envelope.data.into_iter().map(Product::from).collect())
    }

    pub async fn detail(&self, jwt: &str, product_id: i64) -> Result<Product, AppError> {
        let path = format!("/products/{product_id}");
        let response = self
            .client
            .authed(Method::GET, &path, jwt)
            .query(&[("populate", "*")])
            .send()
            .await?;
        let envelope: Envelope<WireProduct> = ApiClient::parse(response).await?;
        Ok(envelope.data.into())
    }

    pub async fn create(&self, jwt: &str, data: &ProductWrite) -> Result<Product, AppError> {
        let response = self
            .client
            .authed(Method::POST, "/products", jwt)
            .json(data)
            .send()
            .await?;
        let envelope: Envelope<WireProduct> = ApiClient::parse(response).await?;
        Ok(envelope.data.into())
    }

    pub async fn update(
        &self,
        jwt: &str,
        product_id: i64,
        data: &ProductWrite,
    ) -> Result<Product, AppError> {
        let path = format!("/products/{product_id}");
        let response = self
            .client
            .authed(Method::PUT, &path, jwt)
            .json(data)
            .send()
            .await?;
        let envelope: Envelope<WireProduct> = ApiClient::parse(response).await?;
        Ok(envelope.data.into())
    }

    pub async fn delete(&self, jwt: &str, product_id: i64) -> Result<(), AppError> {
        let path = format!("/products/{product_id}");
        let response = self.client.authed(Method::DELETE, &path, jwt).send().await?;
        ApiClient::discard(response).await
    }

    // PUT /product/inventory: mutates the quantity of one inventory line.
    pub async fn update_inventory(
        &self,
        jwt: &str,
        update: &InventoryUpdate,
    ) -> Result<(), AppError> {
        let response = self
            .client
            .authed(Method::PUT, "/product/inventory", jwt)
            .json(update)
            .send()
            .await?;
        ApiClient::discard(response).await
    }

    // POST /products/godown: detaches a godown association from a product.
    pub async fn detach_godown(
        &self,
        jwt: &str,
        product_id: i64,
        godown_id: i64,
    ) -> Result<(), AppError> {
        let body = GodownDetach {
            product_id,
            godown_id,
        };
        let response = self
            .client
            .authed(Method::POST, "/products/godown", jwt)
            .json(&body)
            .send()
            .await?;
        ApiClient::discard(response).await
    }
}
