//! Business rules shared by the gateway and its clients.
//!
//! The same checks run before a client submits a form and again in the
//! product service, so a direct API caller cannot store a product that the
//! UI would have refused.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::product::{PriceUpdate, ProductSpec, ProductUpdate};

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_LOCATION_LEN: usize = 100;

/// Prices are stored in minor units (cents).
pub const MAX_PRICE_SCALE: u32 = 2;

/// Keeps prices in cents well inside both `i64` and the integers an `f64`
/// represents exactly.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("prices must be greater than 0")]
    NonPositivePrice,
    #[error("prices cannot exceed 1000000000")]
    PriceTooLarge,
    #[error("prices can have at most 2 decimal places")]
    PriceTooPrecise,
    #[error("the retail price cannot be lower than the wholesale price")]
    RetailBelowWholesale,
    #[error("the stock cannot be negative")]
    NegativeStock,
    #[error("the product name is required")]
    EmptyName,
    #[error("the product name cannot exceed 200 characters")]
    NameTooLong,
    #[error("the description cannot exceed 500 characters")]
    DescriptionTooLong,
    #[error("the location is required")]
    EmptyLocation,
    #[error("the location cannot exceed 100 characters")]
    LocationTooLong,
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for ProductSpec {
    fn validate(&self) -> Result<(), ValidationError> {
        let Self {
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
        } = self;

        validate_prices(*retail_price, *wholesale_price)?;
        validate_stock(*stock)?;
        validate_text(
            name,
            MAX_NAME_LEN,
            ValidationError::EmptyName,
            ValidationError::NameTooLong,
        )?;
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::DescriptionTooLong);
        }
        validate_text(
            location,
            MAX_LOCATION_LEN,
            ValidationError::EmptyLocation,
            ValidationError::LocationTooLong,
        )
    }
}

impl Validate for ProductUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        let (_, spec) = self.clone().into_parts();
        spec.validate()
    }
}

impl Validate for PriceUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_prices(self.retail_price, self.wholesale_price)
    }
}

pub fn validate_prices(retail: Decimal, wholesale: Decimal) -> Result<(), ValidationError> {
    if retail <= Decimal::ZERO || wholesale <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice);
    }
    if retail > MAX_PRICE || wholesale > MAX_PRICE {
        return Err(ValidationError::PriceTooLarge);
    }
    if retail.normalize().scale() > MAX_PRICE_SCALE
        || wholesale.normalize().scale() > MAX_PRICE_SCALE
    {
        return Err(ValidationError::PriceTooPrecise);
    }
    if retail < wholesale {
        return Err(ValidationError::RetailBelowWholesale);
    }
    Ok(())
}

pub fn validate_stock(stock: i32) -> Result<(), ValidationError> {
    if stock < 0 {
        Err(ValidationError::NegativeStock)
    } else {
        Ok(())
    }
}

fn validate_text(
    value: &str,
    max_len: usize,
    if_blank: ValidationError,
    if_too_long: ValidationError,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(if_blank)
    } else if value.chars().count() > max_len {
        Err(if_too_long)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> ProductSpec {
        ProductSpec {
            name: "Widget".into(),
            description: String::new(),
            retail_price: Decimal::new(1000, 2),
            wholesale_price: Decimal::new(500, 2),
            location: "A1".into(),
            stock: 3,
        }
    }

    #[test]
    fn accepts_valid_product() {
        assert_eq!(widget().validate(), Ok(()));
    }

    #[test]
    fn accepts_equal_prices() {
        let spec = ProductSpec {
            wholesale_price: Decimal::new(10, 0),
            ..widget()
        };
        assert_eq!(spec.validate(), Ok(()));
    }

    #[test]
    fn rejects_non_positive_prices() {
        let spec = ProductSpec {
            retail_price: Decimal::ZERO,
            ..widget()
        };
        assert_eq!(spec.validate(), Err(ValidationError::NonPositivePrice));

        let spec = ProductSpec {
            wholesale_price: Decimal::new(-1, 0),
            ..widget()
        };
        assert_eq!(spec.validate(), Err(ValidationError::NonPositivePrice));
    }

    #[test]
    fn rejects_prices_above_the_cap() {
        assert_eq!(validate_prices(MAX_PRICE, Decimal::new(5, 0)), Ok(()));
        assert_eq!(
            validate_prices(MAX_PRICE + Decimal::new(1, 2), Decimal::new(5, 0)),
            Err(ValidationError::PriceTooLarge),
        );
        assert_eq!(
            validate_prices(Decimal::MAX, Decimal::MAX),
            Err(ValidationError::PriceTooLarge),
        );

        let spec = ProductSpec {
            retail_price: Decimal::from_i128_with_scale(10i128.pow(20), 0),
            ..widget()
        };
        assert_eq!(spec.validate(), Err(ValidationError::PriceTooLarge));
    }

    #[test]
    fn rejects_retail_below_wholesale() {
        let spec = ProductSpec {
            retail_price: Decimal::new(4, 0),
            ..widget()
        };
        assert_eq!(spec.validate(), Err(ValidationError::RetailBelowWholesale));
    }

    #[test]
    fn rejects_sub_cent_prices() {
        assert_eq!(
            validate_prices(Decimal::new(10_005, 3), Decimal::new(5, 0)),
            Err(ValidationError::PriceTooPrecise),
        );
        // trailing zeros do not count as precision
        assert_eq!(
            validate_prices(Decimal::new(10_000, 3), Decimal::new(5, 0)),
            Ok(())
        );
    }

    #[test]
    fn rejects_negative_stock() {
        let spec = ProductSpec {
            stock: -1,
            ..widget()
        };
        assert_eq!(spec.validate(), Err(ValidationError::NegativeStock));
        assert_eq!(validate_stock(0), Ok(()));
    }

    #[test]
    fn rejects_blank_text_fields() {
        let spec = ProductSpec {
            name: "   ".into(),
            ..widget()
        };
        assert_eq!(spec.validate(), Err(ValidationError::EmptyName));

        let spec = ProductSpec {
            location: String::new(),
            ..widget()
        };
        assert_eq!(spec.validate(), Err(ValidationError::EmptyLocation));
    }

    #[test]
    fn rejects_over_long_text_fields() {
        let spec = ProductSpec {
            name: "n".repeat(MAX_NAME_LEN + 1),
            ..widget()
        };
        assert_eq!(spec.validate(), Err(ValidationError::NameTooLong));

        let spec = ProductSpec {
            description: "d".repeat(MAX_DESCRIPTION_LEN + 1),
            ..widget()
        };
        assert_eq!(spec.validate(), Err(ValidationError::DescriptionTooLong));

        let spec = ProductSpec {
            location: "l".repeat(MAX_LOCATION_LEN + 1),
            ..widget()
        };
        assert_eq!(spec.validate(), Err(ValidationError::LocationTooLong));

        let spec = ProductSpec {
            name: "ñ".repeat(MAX_NAME_LEN),
            ..widget()
        };
        assert_eq!(spec.validate(), Ok(()));
    }
}
