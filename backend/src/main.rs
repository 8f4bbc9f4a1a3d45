//! Backend entry-point: loads configuration and runs the HTTP server.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bookshare::domain::ListingPolicy;
use bookshare::inbound::http::health::HealthState;
use bookshare::inbound::http::session_config::{BuildMode, session_settings};
use bookshare::settings::ServerSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os()).map_err(|err| {
        error!(error = %err, "configuration failed to load");
        std::io::Error::other(format!("configuration failed to load: {err}"))
    })?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .map_err(|err| {
            error!(error = %err, "invalid session configuration");
            std::io::Error::other(err)
        })?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

    let config = ServerConfig::new(session, bind_addr)
        .with_listing_policy(ListingPolicy::new(settings.price_ceiling()));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
