/// Solar system feed service: orbital kinematics plus aggregated sky events
mod clients;
mod clock;
mod config;
mod data;
mod domain;
mod errors;
mod handlers;
mod orbit;
mod repo;
mod routes;
mod services;
mod sources;
mod utils;

use crate::clients::{EonetClient, HttpClient, ImageLibraryClient, IssClient, NasaClient, NoaaClient};
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::orbit::{solar_system, SolarSystem};
use crate::routes::build_router;
use crate::services::{ApodService, EventService, EventSources, OrbitService, PlanetService, Pipeline};
use crate::sources::{DonkiSource, EonetSource, IssSource, NeoSource, XraySource};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    // Validate the body table before serving anything
    let system = SolarSystem::new(solar_system())?;
    info!("Orbital body table validated ({} bodies)", system.bodies().len());

    // Initialize clients
    let http = HttpClient::new(config.fetch_timeout)?;
    let nasa_client = NasaClient::new(
        http.clone(),
        config.nasa_api_url.clone(),
        config.nasa_api_key.clone(),
    );
    let eonet_client = EonetClient::new(http.clone(), config.eonet_url.clone());
    let iss_client = IssClient::new(http.clone(), config.where_iss_url.clone());
    let noaa_client = NoaaClient::new(http.clone(), config.noaa_xray_url.clone());
    let image_client = ImageLibraryClient::new(http, config.nasa_images_url.clone());

    let sources = EventSources {
        eonet: Arc::new(EonetSource::new(eonet_client)),
        iss: Arc::new(IssSource::new(iss_client)),
        donki: Arc::new(DonkiSource::new(nasa_client.clone())),
        neo: Arc::new(NeoSource::new(nasa_client.clone())),
        xray: Arc::new(XraySource::new(noaa_client)),
    };

    // Initialize services
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ttls = &config.cache_ttls;
    let event_service = Arc::new(EventService::new(
        sources,
        Pipeline::new(config.fetch_timeout, config.event_limit),
        clock.clone(),
        ttls.events,
        ttls.planet_events,
    ));
    let planet_service = Arc::new(PlanetService::new(
        nasa_client.clone(),
        image_client,
        clock.clone(),
        ttls.planet,
    ));
    let apod_service = Arc::new(ApodService::new(nasa_client, clock.clone(), ttls.apod));
    let orbit_service = Arc::new(OrbitService::new(system, clock.clone()));

    // Initialize application state
    let state = AppState {
        clock,
        event_service,
        planet_service,
        apod_service,
        orbit_service,
    };

    // Build router
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("solar_feed service listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
