use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use inventory_api::error::{ErrorCode, ErrorResponse, ProductError};
use thiserror::Error;

use crate::auth::AuthError;

/// Every failure a route can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
    #[error(transparent)]
    Product(#[from] ProductError),
}

impl ApiError {
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest(message.to_string())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::BadRequest(_) => ErrorCode::BadRequest,
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::Product(ProductError::NotFound(_)) => ErrorCode::NotFound,
            Self::Product(ProductError::Invalid(_)) => ErrorCode::Invalid,
            Self::Product(ProductError::Database(_)) => ErrorCode::Internal,
        }
    }

    fn message(&self) -> String {
        match self {
            // store internals stay in the logs
            Self::Product(ProductError::Database(_)) => "internal server error".into(),
            Self::Product(ProductError::Invalid(error)) => error.to_string(),
            error => error.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::BadRequest | ErrorCode::Invalid => StatusCode::BAD_REQUEST,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if matches!(self, Self::Unauthorized(_)) {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(ErrorResponse {
            code: self.code(),
            message: self.message(),
        })
    }
}
