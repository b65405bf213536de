/// Application configuration module
use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub nasa_api_url: String,
    pub nasa_api_key: String,
    pub eonet_url: String,
    pub where_iss_url: String,
    pub noaa_xray_url: String,
    pub nasa_images_url: String,
    pub fetch_timeout: Duration,
    pub event_limit: usize,
    pub cache_ttls: CacheTtls,
}

#[derive(Clone, Debug)]
pub struct CacheTtls {
    pub events: Duration,
    pub planet_events: Duration,
    pub planet: Duration,
    pub apod: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            events: Duration::from_secs(600),
            planet_events: Duration::from_secs(600),
            planet: Duration::from_secs(900),
            apod: Duration::from_secs(21600), // 6h
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let nasa_api_url =
            env::var("NASA_API_URL").unwrap_or_else(|_| "https://api.nasa.gov".to_string());

        let nasa_api_key = env::var("NASA_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| "DEMO_KEY".to_string());

        let eonet_url = env::var("EONET_URL")
            .unwrap_or_else(|_| "https://eonet.gsfc.nasa.gov/api/v3/events".to_string());

        let where_iss_url = env::var("WHERE_ISS_URL")
            .unwrap_or_else(|_| "https://api.wheretheiss.at/v1/satellites/25544".to_string());

        let noaa_xray_url = env::var("NOAA_XRAY_URL").unwrap_or_else(|_| {
            "https://services.swpc.noaa.gov/json/goes/primary/xrays-7-day.json".to_string()
        });

        let nasa_images_url = env::var("NASA_IMAGES_URL")
            .unwrap_or_else(|_| "https://images-api.nasa.gov/search".to_string());

        let defaults = CacheTtls::default();
        let cache_ttls = CacheTtls {
            events: env_secs("EVENTS_TTL_SECONDS", defaults.events),
            planet_events: env_secs("PLANET_EVENTS_TTL_SECONDS", defaults.planet_events),
            planet: env_secs("PLANET_TTL_SECONDS", defaults.planet),
            apod: env_secs("APOD_TTL_SECONDS", defaults.apod),
        };

        let event_limit = env_u64("EVENT_LIMIT", 20);
        if event_limit == 0 {
            anyhow::bail!("EVENT_LIMIT must be positive");
        }

        Ok(Self {
            bind_addr,
            nasa_api_url,
            nasa_api_key,
            eonet_url,
            where_iss_url,
            noaa_xray_url,
            nasa_images_url,
            fetch_timeout: env_secs("FETCH_TIMEOUT_SECONDS", Duration::from_secs(5)),
            event_limit: event_limit as usize,
            cache_ttls,
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_secs(key: &str, default: Duration) -> Duration {
    Duration::from_secs(env_u64(key, default.as_secs()))
}
