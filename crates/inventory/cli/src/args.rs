use std::env;

use anyhow::Result;
use clap::{value_parser, ArgAction, Parser};
use inventory_cli::{manager::ProductManager, view::TerminalView};
use inventory_client::{ProductClient, ProductClientArgs};
use inventory_core::{component::NetworkComponent, signal::FunctionSignal};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    #[command(flatten)]
    common: ArgsCommon,

    #[command(subcommand)]
    command: crate::commands::Command,
}

impl Args {
    pub(crate) async fn run(self) -> Result<()> {
        let manager = self.common.run().await?;
        self.command.run(&manager).await
    }
}

#[derive(Parser)]
pub(crate) struct ArgsCommon {
    /// Turn debugging information on
    #[arg(short, long, global = true, env = "INVENTORY_DEBUG", action = ArgAction::Count)]
    #[arg(value_parser = value_parser!(u8).range(..=3))]
    debug: u8,

    #[command(flatten)]
    client: ProductClientArgs,
}

impl ArgsCommon {
    async fn run(self) -> Result<ProductManager<TerminalView>> {
        self.init_logger();

        let signal = FunctionSignal::default();
        let client = ProductClient::try_new(self.client, &signal).await?;
        Ok(ProductManager::new(client, TerminalView::default()))
    }

    fn init_logger(&self) {
        let debug_level = match self.debug {
            0 => "WARN",
            1 => "INFO",
            2 => "DEBUG",
            _ => "TRACE",
        };
        env::set_var("RUST_LOG", debug_level);
        ::inventory_core::tracer::init_once();
    }
}
