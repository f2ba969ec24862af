use anyhow::Error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{product::ProductSpec, validation::ValidationError, BaseModel};

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("product not found: {0}")]
    NotFound(<ProductSpec as BaseModel>::Id),
    #[error("invalid product: {0}")]
    Invalid(#[from] ValidationError),
    #[error("failed to access the product store: {0}")]
    Database(Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    BadRequest,
    Internal,
    Invalid,
    NotFound,
    Unauthorized,
}

/// JSON body of every non-2xx gateway response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}
