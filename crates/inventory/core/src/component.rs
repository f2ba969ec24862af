use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use tracing::{instrument, Level};

use crate::signal::FunctionSignal;

/// A long-lived service part built from its command-line/env arguments.
#[async_trait]
pub trait NetworkComponent {
    type Args;

    async fn try_new(
        args: <Self as NetworkComponent>::Args,
        signal: &FunctionSignal,
    ) -> Result<Self>
    where
        Self: Sized;
}

#[async_trait]
pub trait NetworkComponentExt
where
    Self: NetworkComponent,
    <Self as NetworkComponent>::Args: Send + Parser,
{
    #[instrument(level = Level::INFO, skip(signal))]
    async fn try_default(signal: &FunctionSignal) -> Result<Self>
    where
        Self: Sized,
    {
        let args = <Self as NetworkComponent>::Args::try_parse()?;
        <Self as NetworkComponent>::try_new(args, signal).await
    }
}

#[async_trait]
impl<T> NetworkComponentExt for T
where
    Self: NetworkComponent,
    <Self as NetworkComponent>::Args: Send + Parser,
{
}
