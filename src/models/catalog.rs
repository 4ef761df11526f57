// src/models/catalog.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// --- Godowns (warehouses) ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Godown {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
}

// --- Inventory line: quantity of one product held at one godown ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryLine {
    pub id: i64,
    pub quantity: i64,
    pub godown: Godown,
}

// --- Categories (many-to-many with products) ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub document_id: String,
    pub name: String,
    pub image_url: Option<String>,
}

// Read-only, attached at creation via externally-uploaded image ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    pub thumbnail_url: Option<String>,
}

// --- Products ---
// The central entity. Owns its inventory and category associations as
// embedded lists; the client holds only transient, refetch-on-demand copies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub minimum_selling_price: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub images: Vec<ProductImage>,
    pub inventory: Vec<InventoryLine>,
    pub categories: Vec<Category>,
}

impl Product {
    // Sum of the quantities across every inventory line.
    pub fn total_quantity(&self) -> i64 {
        self.inventory.iter().map(|line| line.quantity).sum()
    }

    pub fn has_category(&self, category_id: i64) -> bool {
        self.categories.iter().any(|cat| cat.id == category_id)
    }

    pub fn stocked_in(&self, godown_id: i64) -> bool {
        self.inventory.iter().any(|line| line.godown.id == godown_id)
    }
}

// --- Write shapes ---
// The backend expects snake_case scalars but camelCase association keys
// (godownId, imageIds). The renames below mirror that wire contract exactly.

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InventoryWrite {
    #[serde(rename = "godownId")]
    pub godown_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductWrite {
    pub name: String,
    pub minimum_selling_price: Decimal,
    pub purchase_price: Decimal,
    pub description: String,
    pub brand: String,
    pub car_name: String,
    pub part_no: String,
    pub categories: Vec<i64>,
    pub inventory: Vec<InventoryWrite>,
    #[serde(rename = "imageIds")]
    pub image_ids: Vec<i64>,
}

// Body of PUT /product/inventory: mutates the quantity of a single line.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdate {
    pub product_id: i64,
    pub godown_id: i64,
    pub quantity: i64,
}

// Body of POST /products/godown: detaches a godown from a product.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GodownDetach {
    pub product_id: i64,
    pub godown_id: i64,
}
