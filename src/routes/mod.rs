/// Application routes configuration
use crate::handlers::{
    get_apod, get_events, get_orbit_body, get_orbit_paths, get_orbits, get_planet,
    get_planet_events, get_time, health, set_time, toggle_time, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Event feeds
        .route("/api/events", get(get_events))
        .route("/api/planet/:name/events", get(get_planet_events))
        // Planet details and imagery
        .route("/api/planet/:name", get(get_planet))
        .route("/api/apod", get(get_apod))
        // Orbital engine
        .route("/api/orbits", get(get_orbits))
        .route("/api/orbits/paths", get(get_orbit_paths))
        .route("/api/orbits/:name", get(get_orbit_body))
        .route("/api/time", get(get_time).post(set_time))
        .route("/api/time/toggle", post(toggle_time))
        .with_state(state)
}
