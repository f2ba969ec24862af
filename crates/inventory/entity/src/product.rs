use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use inventory_api::{
    product::{PriceUpdate, Product, ProductSpec},
    BaseModel,
};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use sea_orm::{
    ActiveModelBehavior, ActiveValue, DeriveEntityModel, DerivePrimaryKey, DeriveRelation,
    EntityTrait, EnumIter, PrimaryKeyTrait,
};

type Id = <ProductSpec as BaseModel>::Id;
type Price = <ProductSpec as BaseModel>::Price;
type Count = <ProductSpec as BaseModel>::Count;

/// Number of fractional digits kept by the price columns.
const PRICE_SCALE: u32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    pub name: String,
    pub description: String,
    /// Minor units (cents).
    pub retail_price: i64,
    /// Minor units (cents).
    pub wholesale_price: i64,
    pub location: String,
    pub stock: Count,
    #[sea_orm(column_type = "Timestamp")]
    pub created_at: NaiveDateTime,
    #[sea_orm(column_type = "Timestamp")]
    pub updated_at: NaiveDateTime,
}

impl From<Model> for Product {
    fn from(value: Model) -> Self {
        let Model {
            id,
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
            created_at,
            updated_at,
        } = value;

        Self {
            id,
            name,
            description,
            retail_price: from_minor_units(retail_price),
            wholesale_price: from_minor_units(wholesale_price),
            location,
            stock,
            created_at: created_at.and_utc(),
            updated_at: updated_at.and_utc(),
        }
    }
}

impl ActiveModel {
    pub const fn from_id(id: Id) -> Self {
        Self {
            id: ActiveValue::Unchanged(id),
            name: ActiveValue::NotSet,
            description: ActiveValue::NotSet,
            retail_price: ActiveValue::NotSet,
            wholesale_price: ActiveValue::NotSet,
            location: ActiveValue::NotSet,
            stock: ActiveValue::NotSet,
            created_at: ActiveValue::NotSet,
            updated_at: ActiveValue::NotSet,
        }
    }

    /// Builds a fresh row; both timestamps take `now`.
    pub fn from_spec(spec: ProductSpec, id: Id, now: NaiveDateTime) -> Result<Self> {
        Ok(Self {
            id: ActiveValue::Set(id),
            created_at: ActiveValue::Set(now),
            ..Self::from_spec_update(spec, id, now)?
        })
    }

    /// Overwrites every mutable column of an existing row.
    pub fn from_spec_update(spec: ProductSpec, id: Id, now: NaiveDateTime) -> Result<Self> {
        let ProductSpec {
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
        } = spec;

        Ok(Self {
            name: ActiveValue::Set(name),
            description: ActiveValue::Set(description),
            retail_price: ActiveValue::Set(into_minor_units(retail_price)?),
            wholesale_price: ActiveValue::Set(into_minor_units(wholesale_price)?),
            location: ActiveValue::Set(location),
            stock: ActiveValue::Set(stock),
            updated_at: ActiveValue::Set(now),
            ..Self::from_id(id)
        })
    }

    pub fn from_stock(id: Id, stock: Count, now: NaiveDateTime) -> Self {
        Self {
            stock: ActiveValue::Set(stock),
            updated_at: ActiveValue::Set(now),
            ..Self::from_id(id)
        }
    }

    pub fn from_prices(id: Id, prices: PriceUpdate, now: NaiveDateTime) -> Result<Self> {
        let PriceUpdate {
            retail_price,
            wholesale_price,
        } = prices;

        Ok(Self {
            retail_price: ActiveValue::Set(into_minor_units(retail_price)?),
            wholesale_price: ActiveValue::Set(into_minor_units(wholesale_price)?),
            updated_at: ActiveValue::Set(now),
            ..Self::from_id(id)
        })
    }
}

pub fn into_minor_units(price: Price) -> Result<i64> {
    let scaled = price
        .checked_mul(Decimal::from(10i64.pow(PRICE_SCALE)))
        .ok_or_else(|| anyhow!("price is out of range: {price}"))?;
    if scaled.fract() != Decimal::ZERO {
        return Err(anyhow!(
            "price has more than {PRICE_SCALE} decimal places: {price}"
        ));
    }
    scaled
        .to_i64()
        .ok_or_else(|| anyhow!("price is out of range: {price}"))
}

pub fn from_minor_units(value: i64) -> Price {
    Decimal::new(value, PRICE_SCALE)
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
