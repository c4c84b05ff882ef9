//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::io;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::{seed_demo_leads, seed_staff_accounts};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, session_settings};
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use backend::settings::ServerSettings;
use ortho_config::OrthoConfig;

use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;

    let mut config = ServerConfig::new(session, settings.bind_addr());
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(prepare_database(database_url, &settings).await?);
    }

    let http_state = build_http_state(&config);
    if settings.seed_demo_data {
        let staff = seed_staff_accounts(http_state.registrations.as_ref())
            .await
            .map_err(io::Error::other)?;
        info!(staff, "demo staff seeding finished");
        let seeded = seed_demo_leads(
            http_state.lead_queries.as_ref(),
            http_state.lead_submissions.as_ref(),
        )
        .await
        .map_err(io::Error::other)?;
        info!(seeded, "demo lead seeding finished");
    }

    let health_state = web::Data::new(HealthState::new());
    info!(
        bind_addr = %config.bind_addr(),
        storage = config.storage_label(),
        "starting lead desk server"
    );
    let server = create_server(health_state.clone(), http_state, config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

async fn prepare_database(database_url: &str, settings: &ServerSettings) -> io::Result<DbPool> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_migrations(&url))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;

    DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_max_connections()))
        .await
        .map_err(io::Error::other)
}
