use anyhow::anyhow;
use inventory_core::{component::NetworkComponentExt, signal::FunctionSignal};
use inventory_gateway::agent::Agent;
use tracing::{error, info};

#[::tokio::main]
async fn main() {
    ::inventory_core::tracer::init_once();
    info!("Welcome to inventory gateway!");

    let signal = FunctionSignal::default();
    if let Err(error) = signal.trap_on_sigint() {
        error!("{error}");
        return;
    }

    info!("Booting...");
    let agent = match <Agent as NetworkComponentExt>::try_default(&signal).await {
        Ok(agent) => agent,
        Err(error) => {
            signal
                .panic(anyhow!("failed to init inventory gateway: {error}"))
                .await
        }
    };

    info!("Registering gateway workers...");
    let handlers = agent.spawn_workers();

    info!("Ready");
    signal.wait_to_terminate().await;

    info!("Terminating...");
    for handler in handlers {
        handler.abort();
    }

    if let Err(error) = agent.close().await {
        error!("{error}");
    };

    signal.exit().await
}
