use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mutable fields of a product, as submitted on create.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "::rust_decimal::serde::float")]
    pub retail_price: Decimal,
    #[serde(with = "::rust_decimal::serde::float")]
    pub wholesale_price: Decimal,
    pub location: String,
    pub stock: i32,
}

impl super::BaseModel for ProductSpec {
    type Id = Uuid;
    type Price = Decimal;
    type Count = i32;
}

type Id = <ProductSpec as super::BaseModel>::Id;
type Price = <ProductSpec as super::BaseModel>::Price;
type Count = <ProductSpec as super::BaseModel>::Count;

/// Transfer record of a stored product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Id,
    pub name: String,
    pub description: String,
    #[serde(with = "::rust_decimal::serde::float")]
    pub retail_price: Price,
    #[serde(with = "::rust_decimal::serde::float")]
    pub wholesale_price: Price,
    pub location: String,
    pub stock: Count,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn spec(&self) -> ProductSpec {
        ProductSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            retail_price: self.retail_price,
            wholesale_price: self.wholesale_price,
            location: self.location.clone(),
            stock: self.stock,
        }
    }
}

/// Body of a full update; `id` must match the id in the request path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "::rust_decimal::serde::float")]
    pub retail_price: Price,
    #[serde(with = "::rust_decimal::serde::float")]
    pub wholesale_price: Price,
    pub location: String,
    pub stock: Count,
}

impl ProductUpdate {
    pub fn new(id: Id, spec: ProductSpec) -> Self {
        let ProductSpec {
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
        } = spec;

        Self {
            id,
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
        }
    }

    pub fn into_parts(self) -> (Id, ProductSpec) {
        let Self {
            id,
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
        } = self;

        let spec = ProductSpec {
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
        };
        (id, spec)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    #[serde(with = "::rust_decimal::serde::float")]
    pub retail_price: Price,
    #[serde(with = "::rust_decimal::serde::float")]
    pub wholesale_price: Price,
}
