use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use inventory_core::{component::NetworkComponent, signal::FunctionSignal};
use serde::{Deserialize, Serialize};
use tokio::{spawn, task::JoinHandle};
use tracing::{instrument, Level};

use crate::{
    auth::{AuthArgs, Authenticator},
    db::{Database, DatabaseArgs},
};

#[derive(Clone)]
pub struct Agent {
    pub(crate) auth: Authenticator,
    pub(crate) db: Database,
    pub(crate) signal: FunctionSignal,
}

#[async_trait]
impl NetworkComponent for Agent {
    type Args = AgentArgs;

    #[instrument(level = Level::INFO, skip(args, signal))]
    async fn try_new(
        args: <Self as NetworkComponent>::Args,
        signal: &FunctionSignal,
    ) -> Result<Self> {
        let AgentArgs { auth, db } = args;

        let auth = Authenticator::try_new(auth)?;
        let db = Database::try_new(db).await?;

        Ok(Self {
            auth,
            db,
            signal: signal.clone(),
        })
    }
}

impl Agent {
    pub fn spawn_workers(&self) -> Vec<JoinHandle<()>> {
        vec![spawn(crate::actix::loop_forever(self.clone()))]
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn close(self) -> Result<()> {
        self.db.close().await
    }
}

#[derive(Clone, Debug, Default, Parser, Serialize, Deserialize)]
#[clap(rename_all = "kebab-case")]
#[serde(rename_all = "camelCase")]
pub struct AgentArgs {
    #[command(flatten)]
    #[serde(default)]
    pub auth: AuthArgs,

    #[command(flatten)]
    #[serde(default)]
    pub db: DatabaseArgs,
}
