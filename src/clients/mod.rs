/// External API clients module
use crate::errors::FetchError;
use chrono::{Days, NaiveDate};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

/// HTTP client wrapper with common configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("solar-feed/0.1")
            .build()?;
        Ok(Self { client })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// Send a request and decode JSON, treating non-2xx as a failure
    pub async fn json(&self, req: RequestBuilder) -> Result<Value, FetchError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(resp.json().await?)
    }
}

/// Inclusive `(from, to)` date strings for a window relative to `today`
pub fn date_window(today: NaiveDate, back: u64, ahead: u64) -> (String, String) {
    let from = today - Days::new(back);
    let to = today + Days::new(ahead);
    (from.to_string(), to.to_string())
}

/// DONKI space weather notification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonkiKind {
    Flare,
    CoronalMassEjection,
    GeomagneticStorm,
}

impl DonkiKind {
    fn path(&self) -> &'static str {
        match self {
            DonkiKind::Flare => "FLR",
            DonkiKind::CoronalMassEjection => "CME",
            DonkiKind::GeomagneticStorm => "GST",
        }
    }
}

/// NASA APIs client (APOD, NeoWs, DONKI, Mars rover photos)
#[derive(Clone)]
pub struct NasaClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl NasaClient {
    pub fn new(http: HttpClient, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let req = self.http.get(&format!("{}{}", self.base_url, path));
        if self.api_key.is_empty() {
            req
        } else {
            req.query(&[("api_key", &self.api_key)])
        }
    }

    /// Fetch today's Astronomy Picture of the Day
    pub async fn fetch_apod(&self) -> Result<Value, FetchError> {
        self.http.json(self.get("/planetary/apod")).await
    }

    /// Fetch one random Astronomy Picture of the Day
    pub async fn fetch_random_apod(&self) -> Result<Value, FetchError> {
        let json = self
            .http
            .json(self.get("/planetary/apod").query(&[("count", "1")]))
            .await?;
        json.as_array()
            .and_then(|a| a.first())
            .cloned()
            .ok_or_else(|| FetchError::Malformed("APOD count=1 returned no items".into()))
    }

    /// Fetch Near Earth Objects feed for a date window
    pub async fn fetch_neo_feed(&self, start: &str, end: &str) -> Result<Value, FetchError> {
        let req = self
            .get("/neo/rest/v1/feed")
            .query(&[("start_date", start), ("end_date", end)]);
        self.http.json(req).await
    }

    /// Fetch DONKI notifications of one kind for a date window
    pub async fn fetch_donki(
        &self,
        kind: DonkiKind,
        start: &str,
        end: &str,
    ) -> Result<Value, FetchError> {
        let req = self
            .get(&format!("/DONKI/{}", kind.path()))
            .query(&[("startDate", start), ("endDate", end)]);
        self.http.json(req).await
    }

    /// Fetch latest Curiosity rover photos
    pub async fn fetch_mars_photos(&self) -> Result<Value, FetchError> {
        self.http
            .json(self.get("/mars-photos/api/v1/rovers/curiosity/latest_photos"))
            .await
    }
}

/// NASA EONET natural events client
#[derive(Clone)]
pub struct EonetClient {
    http: HttpClient,
    base_url: String,
}

impl EonetClient {
    pub fn new(http: HttpClient, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Fetch currently open events
    pub async fn fetch_open_events(&self, limit: usize) -> Result<Value, FetchError> {
        let req = self
            .http
            .get(&self.base_url)
            .query(&[("status", "open".to_string()), ("limit", limit.to_string())]);
        self.http.json(req).await
    }
}

/// ISS tracking client
#[derive(Clone)]
pub struct IssClient {
    http: HttpClient,
    base_url: String,
}

impl IssClient {
    pub fn new(http: HttpClient, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Fetch current ISS position
    pub async fn fetch_position(&self) -> Result<Value, FetchError> {
        self.http.json(self.http.get(&self.base_url)).await
    }
}

/// NOAA SWPC GOES X-ray flux client
#[derive(Clone)]
pub struct NoaaClient {
    http: HttpClient,
    xray_url: String,
}

impl NoaaClient {
    pub fn new(http: HttpClient, xray_url: String) -> Self {
        Self { http, xray_url }
    }

    /// Fetch the 7-day X-ray flux series
    pub async fn fetch_xray_flux(&self) -> Result<Value, FetchError> {
        self.http.json(self.http.get(&self.xray_url)).await
    }
}

/// NASA image library search client
#[derive(Clone)]
pub struct ImageLibraryClient {
    http: HttpClient,
    base_url: String,
}

impl ImageLibraryClient {
    pub fn new(http: HttpClient, base_url: String) -> Self {
        Self { http, base_url }
    }

    pub async fn search(&self, query: &str, page_size: usize) -> Result<Value, FetchError> {
        let req = self.http.get(&self.base_url).query(&[
            ("q", query.to_string()),
            ("media_type", "image".to_string()),
            ("page_size", page_size.to_string()),
        ]);
        self.http.json(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_window() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(
            date_window(today, 7, 0),
            ("2025-06-08".to_string(), "2025-06-15".to_string())
        );
        assert_eq!(
            date_window(today, 0, 7),
            ("2025-06-15".to_string(), "2025-06-22".to_string())
        );
    }

    #[test]
    fn test_donki_paths() {
        assert_eq!(DonkiKind::Flare.path(), "FLR");
        assert_eq!(DonkiKind::CoronalMassEjection.path(), "CME");
        assert_eq!(DonkiKind::GeomagneticStorm.path(), "GST");
    }
}
