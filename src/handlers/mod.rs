/// HTTP request handlers
use crate::clock::Clock;
use crate::data::planet_facts;
use crate::domain::{
    Apod, BodyResponse, EventType, EventsResponse, Health, OrbitPathsResponse, OrbitsResponse,
    PlanetDetails, PlanetEventsResponse, TimeResponse,
};
use crate::errors::{ApiError, ApiResult};
use crate::orbit::{path_segments, TimeMode, MIN_PATH_SEGMENTS};
use crate::services::{ApodService, EventService, OrbitService, PlanetService};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub clock: Arc<dyn Clock>,
    pub event_service: Arc<EventService>,
    pub planet_service: Arc<PlanetService>,
    pub apod_service: Arc<ApodService>,
    pub orbit_service: Arc<OrbitService>,
}

impl AppState {
    /// Lowercased body name, if it is one we know about
    fn known_body(&self, name: &str) -> ApiResult<String> {
        let name = name.trim().to_lowercase();
        if self.orbit_service.contains(&name) || planet_facts(&name).is_some() {
            Ok(name)
        } else {
            Err(ApiError::NotFound(format!("Unknown body '{}'", name)))
        }
    }
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        now: state.clock.now(),
    })
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Aggregated feed with status and countdown as of this request, optionally
/// narrowed to one event type
pub async fn get_events(
    Query(query): Query<EventsQuery>,
    State(state): State<AppState>,
) -> ApiResult<Response> {
    let kind = query.kind.as_deref().map(str::parse::<EventType>).transpose()?;
    let feed = state.event_service.latest().await;
    let now = state.clock.now();

    Ok(Json(SuccessResponse::new(EventsResponse {
        events: feed
            .events
            .iter()
            .filter(|e| kind.map_or(true, |k| e.kind == k))
            .map(|e| e.view(now))
            .collect(),
        last_updated: feed.fetched_at,
        sources: state.event_service.source_labels(),
    }))
    .into_response())
}

pub async fn get_planet_events(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Response> {
    let name = state.known_body(&name)?;
    let feed = state.event_service.for_body(&name).await;
    let now = state.clock.now();

    Ok(Json(SuccessResponse::new(PlanetEventsResponse {
        planet: name,
        events: feed.events.iter().map(|e| e.view(now)).collect(),
        last_updated: feed.fetched_at,
    }))
    .into_response())
}

pub async fn get_planet(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<SuccessResponse<PlanetDetails>>> {
    let details = state
        .planet_service
        .details(&name.trim().to_lowercase())
        .await?;
    Ok(Json(SuccessResponse::new(details)))
}

pub async fn get_apod(State(state): State<AppState>) -> ApiResult<Json<SuccessResponse<Apod>>> {
    let apod = state.apod_service.today().await?;
    Ok(Json(SuccessResponse::new(apod)))
}

/// Tick the shared engine once and return every body's state
pub async fn get_orbits(State(state): State<AppState>) -> Json<SuccessResponse<OrbitsResponse>> {
    Json(SuccessResponse::new(state.orbit_service.tick().await))
}

pub async fn get_orbit_body(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<SuccessResponse<BodyResponse>>> {
    let name = name.trim().to_lowercase();
    let body = state
        .orbit_service
        .body(&name)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Unknown body '{}'", name)))?;
    Ok(Json(SuccessResponse::new(body)))
}

#[derive(Debug, Deserialize)]
pub struct PathsQuery {
    pub segments: Option<usize>,
}

pub async fn get_orbit_paths(
    Query(query): Query<PathsQuery>,
    State(state): State<AppState>,
) -> Json<SuccessResponse<OrbitPathsResponse>> {
    let segments = path_segments(query.segments.unwrap_or(MIN_PATH_SEGMENTS));
    Json(SuccessResponse::new(OrbitPathsResponse {
        segments,
        paths: state.orbit_service.paths(segments),
    }))
}

pub async fn get_time(State(state): State<AppState>) -> Json<SuccessResponse<TimeResponse>> {
    Json(SuccessResponse::new(state.orbit_service.time().await))
}

/// Either a numeric speed (0 paused, -1 real time, >0 multiplier) or a mode string
#[derive(Debug, Deserialize)]
pub struct TimeRequest {
    pub speed: Option<f64>,
    pub mode: Option<String>,
}

pub async fn set_time(
    State(state): State<AppState>,
    Json(req): Json<TimeRequest>,
) -> ApiResult<Json<SuccessResponse<TimeResponse>>> {
    let time = match (req.speed, req.mode) {
        (Some(speed), _) => state.orbit_service.set_speed(speed).await?,
        (None, Some(mode)) => {
            let mode: TimeMode = mode.parse()?;
            state.orbit_service.set_mode(mode).await
        }
        (None, None) => {
            return Err(ApiError::InvalidInput(
                "expected 'speed' or 'mode'".to_string(),
            ))
        }
    };
    Ok(Json(SuccessResponse::new(time)))
}

pub async fn toggle_time(State(state): State<AppState>) -> Json<SuccessResponse<TimeResponse>> {
    Json(SuccessResponse::new(state.orbit_service.toggle_pause().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{HttpClient, ImageLibraryClient, NasaClient};
    use crate::clock::FixedClock;
    use crate::domain::EventType;
    use crate::orbit::{solar_system, SolarSystem};
    use crate::routes::build_router;
    use crate::services::stubs::{event, now, Behavior, StubSource};
    use crate::services::{EventSources, Pipeline};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now()));
        let sources = EventSources {
            eonet: StubSource::new(
                "eonet",
                Behavior::Events(vec![
                    event("eonet-1", -30, EventType::Planetary, "Wildfire"),
                    event("eonet-2", -1, EventType::Planetary, "Volcano"),
                ]),
            ),
            iss: StubSource::new(
                "iss",
                Behavior::Events(vec![event("iss-live", 0, EventType::IssFlyover, "ISS Live Position")]),
            ),
            donki: StubSource::new("donki", Behavior::Fail),
            neo: StubSource::new(
                "neo",
                Behavior::Events(vec![event("neo-1", 2, EventType::Planetary, "Asteroid 2025 AB")]),
            ),
            xray: StubSource::new("noaa", Behavior::Fail),
        };

        // Unroutable upstreams; tests only reach paths that never call them.
        let http = HttpClient::new(Duration::from_millis(100)).unwrap();
        let nasa = NasaClient::new(http.clone(), "http://127.0.0.1:9".into(), "DEMO_KEY".into());
        let images = ImageLibraryClient::new(http, "http://127.0.0.1:9/search".into());
        let ttl = Duration::from_secs(600);

        AppState {
            clock: clock.clone(),
            event_service: Arc::new(EventService::new(
                sources,
                Pipeline::new(Duration::from_millis(200), 20),
                clock.clone(),
                ttl,
                ttl,
            )),
            planet_service: Arc::new(PlanetService::new(nasa.clone(), images, clock.clone(), ttl)),
            apod_service: Arc::new(ApodService::new(nasa, clock.clone(), ttl)),
            orbit_service: Arc::new(OrbitService::new(
                SolarSystem::new(solar_system()).unwrap(),
                clock,
            )),
        }
    }

    async fn send(state: AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let resp = build_router(state)
            .oneshot(req.body(body).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
        send(state, Method::GET, uri, None).await
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(test_state(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_events_feed_survives_failed_source() {
        let (status, body) = get(test_state(), "/api/events").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);

        let events = body["events"].as_array().unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["neo-1", "iss-live", "eonet-2", "eonet-1"]);

        assert_eq!(events[0]["status"], "upcoming");
        assert_eq!(events[0]["countdown"], "2 hours 0 minutes");
        assert_eq!(events[1]["status"], "ongoing");
        assert_eq!(events[3]["status"], "past");
        assert_eq!(events[3]["countdown"], "Event started");
        assert_eq!(body["sources"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_events_filtered_by_type() {
        let (status, body) = get(test_state(), "/api/events?type=iss_flyover").await;
        assert_eq!(status, StatusCode::OK);
        let events = body["events"].as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["id"], "iss-live");

        let (_, body) = get(test_state(), "/api/events?type=meteor_shower").await;
        assert!(body["events"].as_array().unwrap().is_empty());

        let (status, body) = get(test_state(), "/api/events?type=comet").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_planet_events() {
        let (status, body) = get(test_state(), "/api/planet/Jupiter/events").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["planet"], "jupiter");
        assert_eq!(body["events"][0]["id"], "jupiter-position");
        assert_eq!(body["events"][0]["status"], "ongoing");

        let (_, earth) = get(test_state(), "/api/planet/earth/events").await;
        assert_eq!(earth["events"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_body_is_not_found() {
        let (status, body) = get(test_state(), "/api/planet/pluto/events").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (status, _) = get(test_state(), "/api/planet/pluto").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_orbits_and_paths() {
        let (status, body) = get(test_state(), "/api/orbits").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "1x");
        assert!(body["bodies"]["earth"]["position"]["x"].is_number());
        assert!(body["bodies"]["moon"]["rotationAngle"].is_number());

        let (_, paths) = get(test_state(), "/api/orbits/paths?segments=200").await;
        assert_eq!(paths["segments"], 200);
        assert_eq!(paths["paths"]["earth"]["points"].as_array().unwrap().len(), 201);
        assert_eq!(paths["paths"]["iss"]["parent"], "earth");
    }

    #[tokio::test]
    async fn test_single_body_state() {
        let (status, body) = get(test_state(), "/api/orbits/Moon").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "moon");
        assert_eq!(body["parent"], "earth");
        assert!(body["position"]["x"].is_number());
        assert!(body["distanceFromParent"].as_f64().unwrap() > 0.0);

        let (status, body) = get(test_state(), "/api/orbits/pluto").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_oversized_path_resolution_is_capped() {
        let (status, body) = get(test_state(), "/api/orbits/paths?segments=18446744073709551615").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["segments"], 4096);
        assert_eq!(body["paths"]["mars"]["points"].as_array().unwrap().len(), 4097);

        let (status, body) = get(test_state(), "/api/orbits/paths?segments=100000000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["segments"], 4096);
    }

    #[tokio::test]
    async fn test_time_controls() {
        let state = test_state();

        let (status, body) = send(state.clone(), Method::POST, "/api/time", Some(json!({"speed": 0}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["paused"], true);

        let (_, body) = send(state.clone(), Method::POST, "/api/time/toggle", None).await;
        assert_eq!(body["mode"], "1x");

        let (_, body) = send(state.clone(), Method::POST, "/api/time", Some(json!({"mode": "realtime"}))).await;
        assert_eq!(body["speed"], -1.0);

        let (_, body) = get(state.clone(), "/api/time").await;
        assert_eq!(body["mode"], "realtime");

        let (status, body) = send(state, Method::POST, "/api/time", Some(json!({"mode": "warp"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }
}
