// src/api/wire.rs
//
// Wire representations of the backend payloads and their mapping into the
// domain records of `models::catalog`. The backend sends snake_case monetary
// fields as strings, image variants nested under `formats`, and associations
// as embedded objects; everything a caller sees has already been flattened
// into the camelCase domain shape. Malformed payloads (a price that is not a
// number, an inventory line without its godown) fail deserialization rather
// than defaulting to zero.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de};

use crate::models::catalog::{Category, Godown, InventoryLine, Product, ProductImage};

// Every read endpoint wraps its payload in `{ "data": ... }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

// Monetary fields arrive as strings ("1250.00"), occasionally as bare
// numbers. Absent, null and empty values are unset, never zero.
fn money<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Text(s)) if s.is_empty() => Ok(None),
        Some(Raw::Text(s)) => Decimal::from_str(&s)
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid monetary value {s:?}: {e}"))),
        Some(Raw::Number(n)) => Decimal::try_from(n)
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid monetary value {n}: {e}"))),
    }
}

#[derive(Debug, Deserialize)]
pub struct WireImageFormat {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireImageFormats {
    pub thumbnail: Option<WireImageFormat>,
    pub medium: Option<WireImageFormat>,
}

#[derive(Debug, Deserialize)]
pub struct WireImage {
    pub url: String,
    #[serde(default)]
    pub formats: Option<WireImageFormats>,
}

#[derive(Debug, Deserialize)]
pub struct WireGodown {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireInventoryLine {
    pub id: i64,
    #[serde(default)]
    pub quantity: Option<i64>,
    // A line without its godown is malformed, not defaulted.
    pub godown: WireGodown,
}

#[derive(Debug, Deserialize)]
pub struct WireCategory {
    pub id: i64,
    #[serde(default, rename = "documentId")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<WireImage>,
}

#[derive(Debug, Deserialize)]
pub struct WireProduct {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "money")]
    pub minimum_selling_price: Option<Decimal>,
    #[serde(default, deserialize_with = "money")]
    pub purchase_price: Option<Decimal>,
    #[serde(default)]
    pub images: Option<Vec<WireImage>>,
    #[serde(default)]
    pub inventory: Option<Vec<WireInventoryLine>>,
    #[serde(default)]
    pub categories: Option<Vec<WireCategory>>,
}

impl From<WireGodown> for Godown {
    fn from(wire: WireGodown) -> Self {
        Self {
            id: wire.id,
            name: wire.name.unwrap_or_default(),
            location: wire.location,
        }
    }
}

impl From<WireInventoryLine> for InventoryLine {
    fn from(wire: WireInventoryLine) -> Self {
        Self {
            id: wire.id,
            quantity: wire.quantity.unwrap_or(0),
            godown: wire.godown.into(),
        }
    }
}

impl From<WireImage> for ProductImage {
    fn from(wire: WireImage) -> Self {
        let thumbnail_url = wire
            .formats
            .and_then(|formats| formats.thumbnail)
            .map(|format| format.url);
        Self {
            url: wire.url,
            thumbnail_url,
        }
    }
}

impl From<WireCategory> for Category {
    fn from(wire: WireCategory) -> Self {
        // Prefer the medium variant, fall back to the original upload.
        let image_url = wire.image.map(|image| {
            image
                .formats
                .and_then(|formats| formats.medium)
                .map_or(image.url, |format| format.url)
        });
        Self {
            id: wire.id,
            document_id: wire.document_id.unwrap_or_default(),
            name: wire.name.unwrap_or_default(),
            image_url,
        }
    }
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        Self {
            id: wire.id,
            name: wire.name.unwrap_or_default(),
            description: wire.description,
            brand: wire.brand,
            minimum_selling_price: wire.minimum_selling_price,
            purchase_price: wire.purchase_price,
            images: wire
                .images
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
            inventory: wire
                .inventory
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
            categories: wire
                .categories
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}
