use std::sync::Arc;

use actix_web::{dev::Payload, http::header, web::Data, FromRequest, HttpRequest};
use anyhow::{anyhow, Result};
use argon2::{
    password_hash::rand_core::{OsRng, RngCore},
    Argon2, PasswordHash, PasswordVerifier,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use futures::future::{ready, Ready};
use hmac::{Hmac, Mac};
use inventory_api::auth::{LoginRequest, LoginResponse, TokenClaims};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::{info, instrument, warn, Level};

type HmacSha256 = Hmac<Sha256>;

const SECRET_LEN: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("access token not found")]
    TokenNotFound,
    #[error("access token is malformed")]
    TokenMalformed,
    #[error("access token signature mismatch")]
    InvalidSignature,
    #[error("access token has expired")]
    Expired,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("login is disabled on this gateway")]
    LoginDisabled,
}

/// Issues and verifies the bearer tokens guarding the product routes.
#[derive(Clone)]
pub struct Authenticator {
    username: String,
    password_hash: Option<String>,
    secret: Arc<[u8]>,
    token_ttl: Duration,
}

impl Authenticator {
    #[instrument(level = Level::INFO, skip(args))]
    pub fn try_new(args: AuthArgs) -> Result<Self> {
        let AuthArgs {
            auth_username,
            auth_password_hash,
            auth_secret,
            auth_token_ttl,
        } = args;

        if let Some(hash) = auth_password_hash.as_deref() {
            PasswordHash::new(hash)
                .map_err(|error| anyhow!("failed to parse the auth password hash: {error}"))?;
        } else {
            warn!("No password hash is configured; login is disabled");
        }

        let secret: Arc<[u8]> = match auth_secret {
            Some(secret) if !secret.is_empty() => secret.into_bytes().into(),
            Some(_) | None => {
                info!("Generating an ephemeral token secret");
                let mut secret = [0u8; SECRET_LEN];
                OsRng.fill_bytes(&mut secret);
                secret.to_vec().into()
            }
        };

        let token_ttl = i64::try_from(auth_token_ttl)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| anyhow!("token ttl is out of range: {auth_token_ttl}"))?;

        Ok(Self {
            username: auth_username,
            password_hash: auth_password_hash,
            secret,
            token_ttl,
        })
    }

    #[instrument(level = Level::INFO, skip(self, request), fields(username = %request.username))]
    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let hash = self
            .password_hash
            .as_deref()
            .ok_or(AuthError::LoginDisabled)?;
        let hash = PasswordHash::new(hash).map_err(|_| AuthError::LoginDisabled)?;

        let password_matched = Argon2::default()
            .verify_password(request.password.as_bytes(), &hash)
            .is_ok();
        if request.username != self.username || !password_matched {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue(&request.username, Utc::now());
        Ok(LoginResponse { token })
    }

    pub fn issue(&self, username: &str, now: DateTime<Utc>) -> String {
        let claims = TokenClaims {
            sub: username.into(),
            exp: (now + self.token_ttl).timestamp(),
        };
        // serializing a struct of a string and an integer cannot fail
        let payload = ::serde_json::to_vec(&claims).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(payload);

        let signature = URL_SAFE_NO_PAD.encode(self.mac(&payload).finalize().into_bytes());
        format!("{payload}.{signature}")
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::TokenMalformed)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::TokenMalformed)?;
        self.mac(payload)
            .verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let claims: TokenClaims = URL_SAFE_NO_PAD
            .decode(payload)
            .ok()
            .and_then(|payload| ::serde_json::from_slice(&payload).ok())
            .ok_or(AuthError::TokenMalformed)?;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.secret)
            .unwrap_or_else(|_| unreachable!("hmac accepts keys of any size"));
        mac.update(payload.as_bytes());
        mac
    }
}

/// Extracts the bearer token of a request, without verifying it.
pub fn get_bearer_token(request: &HttpRequest) -> Result<&str, AuthError> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::TokenNotFound)
}

/// A caller holding a valid bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

impl FromRequest for AuthUser {
    type Error = crate::error::ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(request: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            request
                .app_data::<Data<Authenticator>>()
                .ok_or(AuthError::LoginDisabled)
                .and_then(|auth| {
                    let token = get_bearer_token(request)?;
                    auth.verify(token, Utc::now())
                })
                .map(|TokenClaims { sub, exp: _ }| Self { username: sub })
                .map_err(Into::into),
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Parser)]
#[clap(rename_all = "kebab-case")]
#[serde(rename_all = "camelCase")]
pub struct AuthArgs {
    #[arg(
        long,
        env = "INVENTORY_AUTH_USERNAME",
        value_name = "NAME",
        default_value_t = AuthArgs::default_auth_username(),
    )]
    #[serde(default = "AuthArgs::default_auth_username")]
    pub auth_username: String,

    /// Argon2 PHC string of the login password
    #[arg(long, env = "INVENTORY_AUTH_PASSWORD_HASH", value_name = "PHC")]
    #[serde(default)]
    pub auth_password_hash: Option<String>,

    /// HMAC key for signing tokens; random per process when unset
    #[arg(long, env = "INVENTORY_AUTH_SECRET", value_name = "SECRET")]
    #[serde(default)]
    pub auth_secret: Option<String>,

    #[arg(
        long,
        env = "INVENTORY_AUTH_TOKEN_TTL",
        value_name = "SECONDS",
        default_value_t = AuthArgs::default_auth_token_ttl(),
    )]
    #[serde(default = "AuthArgs::default_auth_token_ttl")]
    pub auth_token_ttl: u64,
}

impl Default for AuthArgs {
    fn default() -> Self {
        Self {
            auth_username: Self::default_auth_username(),
            auth_password_hash: None,
            auth_secret: None,
            auth_token_ttl: Self::default_auth_token_ttl(),
        }
    }
}

impl AuthArgs {
    fn default_auth_username() -> String {
        "admin".into()
    }

    const fn default_auth_token_ttl() -> u64 {
        3600
    }
}
