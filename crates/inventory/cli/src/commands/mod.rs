mod product;
mod session;

use anyhow::Result;
use clap::Subcommand;
use inventory_cli::{
    manager::{ManagerError, ProductManager},
    view::{TerminalView, ViewState},
};
use tracing::{instrument, Level};

#[derive(Clone, Debug, Subcommand)]
pub(crate) enum Command {
    #[command(flatten)]
    Product(self::product::Command),

    #[command(flatten)]
    Session(self::session::Command),
}

impl Command {
    #[instrument(level = Level::INFO, skip_all, err(Display))]
    pub(crate) async fn run(self, manager: &ProductManager<TerminalView>) -> Result<()> {
        match self {
            Self::Product(command) => {
                if manager.resume() == ViewState::LoggedOut {
                    return Err(ManagerError::LoggedOut.into());
                }
                command.run(manager).await
            }
            Self::Session(command) => command.run(manager).await,
        }
    }
}
