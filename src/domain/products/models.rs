//! Product Models

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prices::Price;

/// Image path substituted when a payload carries no usable image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

/// Product identifier assigned by the catalog backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejections raised when normalising a raw catalog payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("product payload carries no usable id")]
    MissingId,

    #[error("product payload carries no price")]
    MissingPrice,

    #[error("product price is not a valid amount")]
    InvalidPrice,
}

/// Canonical product shape used by the cart.
///
/// A value of this type is priced and identified by construction; the
/// fallback-laden catalog payloads are mapped here exactly once, at the
/// ingestion boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
}

/// External product payload as the catalog and search surfaces deliver it.
///
/// Field names vary by endpoint: some send `id`, the document store sends
/// `_id`; some send `title`, others `name`; images arrive as a single
/// path, a gallery, or a thumbnail.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, rename = "_id")]
    pub document_id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub images: Option<Vec<String>>,

    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl Product {
    /// Normalise an external payload into the canonical shape.
    ///
    /// Identifier and title fall back across their alternate field names,
    /// the image falls back through gallery and thumbnail to a
    /// placeholder, and the decimal price is converted to minor units.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload has no non-empty id, no price,
    /// or a price that is not a valid amount.
    pub fn from_raw(raw: RawProduct) -> Result<Self, ProductError> {
        let id = non_empty(raw.id)
            .or_else(|| non_empty(raw.document_id))
            .ok_or(ProductError::MissingId)?;

        let price = raw.price.ok_or(ProductError::MissingPrice)?;
        let price = Price::from_raw(price).ok_or(ProductError::InvalidPrice)?;

        let title = non_empty(raw.title)
            .or_else(|| non_empty(raw.name))
            .unwrap_or_default();

        let image = non_empty(raw.image)
            .or_else(|| {
                raw.images
                    .and_then(|images| images.into_iter().next())
                    .and_then(|first| non_empty(Some(first)))
            })
            .or_else(|| non_empty(raw.thumbnail))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

        Ok(Self {
            id: ProductId::new(id),
            title,
            price,
            image,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
