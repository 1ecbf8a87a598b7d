use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;
mod service;
mod store;
mod utils;

#[cfg(test)]
mod test_helpers;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::store::mysql::MySqlStore;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Overtime Management API"
}

/// Daily rolling file log. Hold the guard for the life of the process or
/// buffered lines are lost.
fn init_tracing(config: &Config) -> WorkerGuard {
    let file_appender = rolling::daily(&config.log_dir, "overtime.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .pretty()
        .init();

    guard
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let _log_guard = init_tracing(&config);

    let store = init_db(&config).await?;
    let limiter = Arc::new(routes::build_limiter(config.rate_api_per_min)?);
    let server_addr = config.server_addr.clone();

    info!(
        addr = %server_addr,
        prefix = %config.api_prefix,
        rate_per_min = config.rate_api_per_min,
        "Overtime service starting"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            // wildcard tail so the UI's JS/CSS assets resolve
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(store.clone()))
            .service(index)
            .configure(|cfg| routes::configure::<MySqlStore>(cfg, &config, &limiter))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await
    .context("Server stopped with an error")
}
