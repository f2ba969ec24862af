pub mod token;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use inventory_api::{
    auth::{LoginRequest, LoginResponse},
    error::ErrorResponse,
    product::{PriceUpdate, Product, ProductSpec, ProductUpdate},
    BaseModel,
};
use inventory_core::{component::NetworkComponent, signal::FunctionSignal};
use reqwest::{Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{instrument, warn, Level};
use url::Url;

pub use self::token::TokenStore;

type Id = <ProductSpec as BaseModel>::Id;
type Count = <ProductSpec as BaseModel>::Count;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not logged in or the session has expired")]
    Unauthorized,
    #[error("request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("failed to send the request: {0}")]
    Request(#[from] ::reqwest::Error),
    #[error("invalid request url: {0}")]
    Url(#[from] ::url::ParseError),
    #[error(transparent)]
    TokenStore(::anyhow::Error),
}

/// Authenticated proxy to the inventory gateway.
#[derive(Clone)]
pub struct ProductClient {
    args: ProductClientArgs,
    session: ::reqwest::Client,
    tokens: TokenStore,
}

#[async_trait]
impl NetworkComponent for ProductClient {
    type Args = ProductClientArgs;

    async fn try_new(args: <Self as NetworkComponent>::Args, _: &FunctionSignal) -> Result<Self> {
        let tokens = match args.token_file.clone() {
            Some(path) => TokenStore::open(path)?,
            None => TokenStore::open(TokenStore::default_path()?)?,
        };
        Self::try_with_tokens(args, tokens)
    }
}

impl ProductClient {
    pub fn try_with_tokens(args: ProductClientArgs, tokens: TokenStore) -> Result<Self> {
        Ok(Self {
            args,
            session: ::reqwest::ClientBuilder::new().build()?,
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.is_present()
    }
}

impl ProductClient {
    #[instrument(level = Level::INFO, skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let payload = LoginRequest {
            username: username.into(),
            password: password.into(),
        };
        let request = Request {
            method: Method::POST,
            rel_url: "api/auth/login",
            payload: Some(&payload),
        };

        let LoginResponse { token } = self.fetch(request).await?;
        self.tokens.set(token).map_err(ClientError::TokenStore)
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub fn logout(&self) -> Result<(), ClientError> {
        self.tokens.clear().map_err(ClientError::TokenStore)
    }
}

impl ProductClient {
    #[instrument(level = Level::INFO, skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let request = RequestWithoutPayload {
            method: Method::GET,
            rel_url: "api/products",
            payload: None,
        };
        self.fetch(request).await
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn get_product(&self, prod_id: Id) -> Result<Product, ClientError> {
        let request = RequestWithoutPayload {
            method: Method::GET,
            rel_url: &format!("api/products/{prod_id}"),
            payload: None,
        };
        self.fetch(request).await
    }

    #[instrument(level = Level::INFO, skip(self, spec))]
    pub async fn create_product(&self, spec: &ProductSpec) -> Result<Product, ClientError> {
        let request = Request {
            method: Method::POST,
            rel_url: "api/products",
            payload: Some(spec),
        };
        self.fetch(request).await
    }

    #[instrument(level = Level::INFO, skip(self, update), fields(prod_id = %update.id))]
    pub async fn update_product(&self, update: &ProductUpdate) -> Result<(), ClientError> {
        let request = Request {
            method: Method::PUT,
            rel_url: &format!("api/products/{}", update.id),
            payload: Some(update),
        };
        self.send(request).await
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn update_stock(&self, prod_id: Id, stock: Count) -> Result<(), ClientError> {
        let request = Request {
            method: Method::PATCH,
            rel_url: &format!("api/products/{prod_id}/stock"),
            payload: Some(&stock),
        };
        self.send(request).await
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn update_prices(
        &self,
        prod_id: Id,
        prices: &PriceUpdate,
    ) -> Result<(), ClientError> {
        let request = Request {
            method: Method::PATCH,
            rel_url: &format!("api/products/{prod_id}/prices"),
            payload: Some(prices),
        };
        self.send(request).await
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn delete_product(&self, prod_id: Id) -> Result<(), ClientError> {
        let request = RequestWithoutPayload {
            method: Method::DELETE,
            rel_url: &format!("api/products/{prod_id}"),
            payload: None,
        };
        self.send(request).await
    }
}

impl ProductClient {
    async fn fetch<T, R>(&self, request: Request<'_, T>) -> Result<R, ClientError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        self.execute(request)
            .await?
            .json()
            .await
            .map_err(Into::into)
    }

    async fn send<T>(&self, request: Request<'_, T>) -> Result<(), ClientError>
    where
        T: Serialize,
    {
        self.execute(request).await.map(|_| ())
    }

    async fn execute<T>(&self, request: Request<'_, T>) -> Result<Response, ClientError>
    where
        T: Serialize,
    {
        let Request {
            method,
            rel_url,
            payload,
        } = request;

        let url = self.args.endpoint.join(rel_url)?;
        let mut request = self.session.request(method, url);
        if let Some(token) = self.tokens.get() {
            request = request.bearer_auth(token);
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => {
                if let Err(error) = self.tokens.clear() {
                    warn!("{error}");
                }
                Err(ClientError::Unauthorized)
            }
            status => {
                let message = match response.json::<ErrorResponse>().await {
                    Ok(ErrorResponse { code: _, message }) => message,
                    Err(_) => status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .into(),
                };
                warn!("request failed with status {status}: {message}");
                Err(ClientError::Status { status, message })
            }
        }
    }
}

type RequestWithoutPayload<'a> = Request<'a, ()>;

struct Request<'a, T> {
    method: Method,
    rel_url: &'a str,
    payload: Option<&'a T>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Parser)]
#[clap(rename_all = "kebab-case")]
#[serde(rename_all = "camelCase")]
pub struct ProductClientArgs {
    #[arg(
        long,
        env = "INVENTORY_CLIENT_ENDPOINT",
        value_name = "URL",
        default_value = ProductClientArgs::default_endpoint_str(),
    )]
    #[serde(default = "ProductClientArgs::default_endpoint")]
    pub endpoint: Url,

    /// Where the login token is kept; defaults to the user config directory
    #[arg(long, env = "INVENTORY_CLIENT_TOKEN_FILE", value_name = "PATH")]
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

impl Default for ProductClientArgs {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            token_file: None,
        }
    }
}

impl ProductClientArgs {
    const fn default_endpoint_str() -> &'static str {
        "http://localhost:80/"
    }

    fn default_endpoint() -> Url {
        // the literal above is a well-formed url
        Url::parse(Self::default_endpoint_str()).unwrap_or_else(|_| unreachable!())
    }
}
