//! Backend entry-point: loads settings, wires adapters and serves the hotel API.

mod server;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hotel_admin::inbound::http::health::HealthState;
use hotel_admin::settings::HotelSettings;
use ortho_config::OrthoConfig;
use server::{ServerConfig, build_hotel_service, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = HotelSettings::load()
        .map_err(|err| eyre!("failed to load settings: {err}"))?
        .validate()
        .wrap_err("invalid settings")?;

    let hotels = build_hotel_service(&settings).await;
    let config = ServerConfig::new(settings.bind_addr, hotels, settings.max_upload_bytes);
    info!(bind_addr = %config.bind_addr(), "starting hotel admin server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start HTTP server")?;
    server.await.wrap_err("HTTP server terminated")
}
