use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use liquidator_core::{init_liquidator_core, LiquidatorConfig};
use liquidator_server::api;
use liquidator_server::infrastructure::config::ServerConfig;
use liquidator_server::infrastructure::logger::{LogConfig, Logger};
use liquidator_server::infrastructure::monitoring::MonitoringManager;
use liquidator_server::middleware::metrics::MetricsMiddleware;
use std::sync::Arc;

fn cors(config: &ServerConfig) -> Cors {
    match config.allowed_origins() {
        None => Cors::permissive(),
        Some(origins) => origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .max_age(3600),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let server_config = ServerConfig::from_env().context("Invalid server configuration")?;
    Logger::init(&LogConfig::from(&server_config));

    tracing::info!("Starting liquidator server {}", env!("CARGO_PKG_VERSION"));

    let core_config = LiquidatorConfig::load().context("Invalid liquidator configuration")?;
    let core = Arc::new(
        init_liquidator_core(core_config)
            .await
            .context("Failed to initialize the liquidator core")?,
    );
    tracing::info!("Liquidator core initialized");

    let monitoring_manager = Arc::new(MonitoringManager::new());

    tracing::info!(
        "Listening on {}:{} ({})",
        server_config.host,
        server_config.port,
        server_config.environment
    );

    let bind = (server_config.host.clone(), server_config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(MetricsMiddleware::new(Arc::clone(&monitoring_manager)))
            .wrap(actix_web::middleware::Logger::default())
            .wrap(cors(&server_config))
            .app_data(web::Data::new(Arc::clone(&core)))
            .app_data(web::Data::new(Arc::clone(&monitoring_manager)))
            .configure(api::configure)
    })
    .bind(bind)
    .context("Failed to bind the HTTP listener")?
    .run()
    .await
    .context("HTTP server stopped with an error")
}
