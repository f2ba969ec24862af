pub mod auth;
pub mod product;

use actix_web::web::{JsonConfig, PathConfig, ServiceConfig};

use crate::error::ApiError;

/// Registers every API route, with malformed bodies and paths answered as 400.
pub fn configure(config: &mut ServiceConfig) {
    let json = JsonConfig::default().error_handler(|error, _| ApiError::bad_request(error).into());
    let path = PathConfig::default().error_handler(|error, _| ApiError::bad_request(error).into());

    config
        .app_data(json)
        .app_data(path)
        .service(self::auth::login)
        .service(self::product::list)
        .service(self::product::get)
        .service(self::product::post)
        .service(self::product::put)
        .service(self::product::patch_stock)
        .service(self::product::patch_prices)
        .service(self::product::delete);
}
