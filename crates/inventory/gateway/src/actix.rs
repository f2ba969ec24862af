use std::net::SocketAddr;

use actix_web::{get, middleware, web::Data, App, HttpResponse, HttpServer, Responder};
use actix_web_opentelemetry::{RequestMetrics, RequestTracing};
use anyhow::{anyhow, Result};
use futures::TryFutureExt;
use inventory_core::env::infer_or;
use tracing::{error, info, instrument, Level};

use crate::agent::Agent;

#[instrument(level = Level::INFO)]
#[get("/_health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json("healthy")
}

pub async fn loop_forever(agent: Agent) {
    match try_loop_forever(&agent).await {
        Ok(()) => agent.signal.terminate(),
        Err(error) => {
            error!("failed to operate http server: {error}");
            agent.signal.terminate_on_panic()
        }
    }
}

async fn try_loop_forever(agent: &Agent) -> Result<()> {
    info!("Starting http server...");

    // Initialize pipe
    let addr = infer_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 80)))?;

    let auth = Data::new(agent.auth.clone());
    let db = Data::new(agent.db.clone());

    // Create a http server
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(Data::clone(&auth))
            .app_data(Data::clone(&db));
        let app = app.service(health).configure(crate::routes::configure);
        app.wrap(middleware::NormalizePath::new(
            middleware::TrailingSlash::Trim,
        ))
        .wrap(RequestTracing::default())
        .wrap(RequestMetrics::default())
    })
    .bind(addr)
    .map_err(|error| anyhow!("failed to bind to {addr}: {error}"))?;

    // Start http server
    server.run().map_err(Into::into).await
}
