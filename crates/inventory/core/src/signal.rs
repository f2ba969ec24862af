use std::{
    process,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{anyhow, Error, Result};
use tokio::time::sleep;
use tracing::{error, info};

/// Cooperative shutdown flag shared between the main task and its workers.
#[derive(Clone, Debug, Default)]
pub struct FunctionSignal {
    has_failed: Arc<AtomicBool>,
    is_terminating: Arc<AtomicBool>,
}

impl FunctionSignal {
    pub fn trap_on_sigint(&self) -> Result<()> {
        let signal = self.clone();
        ::ctrlc::set_handler(move || signal.terminate())
            .map_err(|error| anyhow!("failed to set SIGINT handler: {error}"))
    }

    pub fn terminate(&self) {
        info!("Gracefully shutting down...");
        self.is_terminating.store(true, Ordering::SeqCst)
    }

    pub fn terminate_on_panic(&self) {
        self.has_failed.store(true, Ordering::SeqCst);
        self.terminate()
    }

    pub fn is_terminating(&self) -> bool {
        self.is_terminating.load(Ordering::SeqCst)
    }

    pub fn has_failed(&self) -> bool {
        self.has_failed.load(Ordering::SeqCst)
    }

    pub async fn wait_to_terminate(&self) {
        while !self.is_terminating() {
            sleep(Duration::from_millis(100)).await;
        }
    }

    /// Logs `error` and exits the process with a failure code.
    pub async fn panic(&self, error: Error) -> ! {
        error!("{error}");
        self.terminate_on_panic();
        self.exit().await
    }

    pub async fn exit(&self) -> ! {
        let code = if self.has_failed() { 1 } else { 0 };
        info!("Terminated (exit code: {code})");
        process::exit(code)
    }
}
