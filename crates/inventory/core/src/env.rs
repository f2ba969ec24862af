use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};

/// Parses the environment variable `key` into `R`.
pub fn infer<K, R>(key: K) -> Result<R>
where
    K: AsRef<str>,
    R: FromStr,
    <R as FromStr>::Err: 'static + Send + Sync + fmt::Display,
{
    let key = key.as_ref();

    infer_string(key).and_then(|value| {
        value
            .parse()
            .map_err(|error| anyhow!("failed to parse the environment variable ({key}): {error}"))
    })
}

/// Like [`infer`], but falls back to `default` when the variable is unset.
///
/// A variable that is present but malformed is still an error.
pub fn infer_or<K, R>(key: K, default: R) -> Result<R>
where
    K: AsRef<str>,
    R: FromStr,
    <R as FromStr>::Err: 'static + Send + Sync + fmt::Display,
{
    let key = key.as_ref();
    match ::std::env::var_os(key) {
        Some(_) => infer(key),
        None => Ok(default),
    }
}

pub fn infer_string<K>(key: K) -> Result<String>
where
    K: AsRef<str>,
{
    let key = key.as_ref();

    ::std::env::var(key).map_err(|_| anyhow!("failed to find the environment variable: {key}"))
}
