use actix_web::{
    post,
    web::{Data, Json},
    HttpResponse,
};
use inventory_api::auth::LoginRequest;
use tracing::{instrument, Level};

use crate::{auth::Authenticator, error::ApiError};

#[instrument(level = Level::INFO, skip(auth))]
#[post("/api/auth/login")]
pub async fn login(
    auth: Data<Authenticator>,
    request: Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let response = auth.login(&request)?;
    Ok(HttpResponse::Ok().json(response))
}
