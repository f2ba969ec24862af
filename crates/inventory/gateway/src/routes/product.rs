use actix_web::{
    delete, get,
    http::header,
    patch, post, put,
    web::{Data, Json, Path},
    HttpResponse,
};
use inventory_api::{
    error::ProductError,
    product::{PriceUpdate, ProductSpec, ProductUpdate},
    BaseModel,
};
use tracing::{instrument, Level};

use crate::{auth::AuthUser, db::Database, error::ApiError};

type Id = <ProductSpec as BaseModel>::Id;
type Count = <ProductSpec as BaseModel>::Count;

#[instrument(level = Level::INFO, skip(db))]
#[get("/api/products")]
pub async fn list(_user: AuthUser, db: Data<Database>) -> Result<HttpResponse, ApiError> {
    let products = db.list_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

#[instrument(level = Level::INFO, skip(db))]
#[get("/api/products/{prod_id}")]
pub async fn get(
    _user: AuthUser,
    db: Data<Database>,
    path: Path<Id>,
) -> Result<HttpResponse, ApiError> {
    let prod_id = path.into_inner();
    match db.get_product(prod_id).await? {
        Some(product) => Ok(HttpResponse::Ok().json(product)),
        None => Err(ProductError::NotFound(prod_id).into()),
    }
}

#[instrument(level = Level::INFO, skip(db, spec))]
#[post("/api/products")]
pub async fn post(
    _user: AuthUser,
    db: Data<Database>,
    spec: Json<ProductSpec>,
) -> Result<HttpResponse, ApiError> {
    let product = db.insert_product(spec.into_inner()).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/products/{}", product.id)))
        .json(product))
}

#[instrument(level = Level::INFO, skip(db, update))]
#[put("/api/products/{prod_id}")]
pub async fn put(
    _user: AuthUser,
    db: Data<Database>,
    path: Path<Id>,
    update: Json<ProductUpdate>,
) -> Result<HttpResponse, ApiError> {
    let prod_id = path.into_inner();
    let (body_id, spec) = update.into_inner().into_parts();
    if body_id != prod_id {
        return Err(ApiError::bad_request(format!(
            "product id mismatch: path has {prod_id}, body has {body_id}"
        )));
    }

    db.update_product(prod_id, spec).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(level = Level::INFO, skip(db))]
#[patch("/api/products/{prod_id}/stock")]
pub async fn patch_stock(
    _user: AuthUser,
    db: Data<Database>,
    path: Path<Id>,
    stock: Json<Count>,
) -> Result<HttpResponse, ApiError> {
    db.update_stock(path.into_inner(), stock.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(level = Level::INFO, skip(db))]
#[patch("/api/products/{prod_id}/prices")]
pub async fn patch_prices(
    _user: AuthUser,
    db: Data<Database>,
    path: Path<Id>,
    prices: Json<PriceUpdate>,
) -> Result<HttpResponse, ApiError> {
    db.update_prices(path.into_inner(), prices.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(level = Level::INFO, skip(db))]
#[delete("/api/products/{prod_id}")]
pub async fn delete(
    _user: AuthUser,
    db: Data<Database>,
    path: Path<Id>,
) -> Result<HttpResponse, ApiError> {
    db.remove_product(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
