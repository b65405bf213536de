/// Upstream event feeds and their normalization into `AstronomicalEvent`
mod normalize;

use crate::clients::{date_window, DonkiKind, EonetClient, IssClient, NasaClient, NoaaClient};
use crate::domain::AstronomicalEvent;
use crate::errors::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::warn;

/// One third-party feed.
///
/// `fetch` performs the network request only; `normalize` maps the native
/// payload into events and is pure.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Tag used as id prefix and in logs
    fn name(&self) -> &'static str;

    /// Human readable attribution
    fn label(&self) -> &'static str {
        self.name()
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<Value, FetchError>;

    fn normalize(&self, raw: &Value, now: DateTime<Utc>) -> Result<Vec<AstronomicalEvent>, FetchError>;
}

/// NASA EONET open natural events
pub struct EonetSource {
    client: EonetClient,
    limit: usize,
}

impl EonetSource {
    pub fn new(client: EonetClient) -> Self {
        Self { client, limit: 10 }
    }
}

#[async_trait]
impl SourceFetcher for EonetSource {
    fn name(&self) -> &'static str {
        "eonet"
    }

    fn label(&self) -> &'static str {
        "NASA EONET (Earth Events)"
    }

    async fn fetch(&self, _now: DateTime<Utc>) -> Result<Value, FetchError> {
        self.client.fetch_open_events(self.limit).await
    }

    fn normalize(&self, raw: &Value, now: DateTime<Utc>) -> Result<Vec<AstronomicalEvent>, FetchError> {
        normalize::eonet(raw, now)
    }
}

/// Live ISS position as a single flyover event
pub struct IssSource {
    client: IssClient,
}

impl IssSource {
    pub fn new(client: IssClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceFetcher for IssSource {
    fn name(&self) -> &'static str {
        "iss"
    }

    fn label(&self) -> &'static str {
        "Where The ISS At (ISS Tracking)"
    }

    async fn fetch(&self, _now: DateTime<Utc>) -> Result<Value, FetchError> {
        self.client.fetch_position().await
    }

    fn normalize(&self, raw: &Value, _now: DateTime<Utc>) -> Result<Vec<AstronomicalEvent>, FetchError> {
        normalize::iss(raw).map(|e| vec![e])
    }
}

/// DONKI flares, CMEs and geomagnetic storms over the last week
pub struct DonkiSource {
    client: NasaClient,
    days_back: u64,
}

impl DonkiSource {
    pub fn new(client: NasaClient) -> Self {
        Self {
            client,
            days_back: 7,
        }
    }
}

#[async_trait]
impl SourceFetcher for DonkiSource {
    fn name(&self) -> &'static str {
        "donki"
    }

    fn label(&self) -> &'static str {
        "NASA DONKI (Space Weather)"
    }

    /// Queries the three notification kinds concurrently; a kind that fails
    /// contributes an empty list unless all three fail.
    async fn fetch(&self, now: DateTime<Utc>) -> Result<Value, FetchError> {
        let (from, to) = date_window(now.date_naive(), self.days_back, 0);
        let (flr, cme, gst) = futures::join!(
            self.client.fetch_donki(DonkiKind::Flare, &from, &to),
            self.client.fetch_donki(DonkiKind::CoronalMassEjection, &from, &to),
            self.client.fetch_donki(DonkiKind::GeomagneticStorm, &from, &to),
        );

        settle_donki(flr, cme, gst)
    }

    fn normalize(&self, raw: &Value, _now: DateTime<Utc>) -> Result<Vec<AstronomicalEvent>, FetchError> {
        normalize::donki(raw)
    }
}

/// Merge the three DONKI kinds into one payload; a failed kind becomes an
/// empty list unless every kind failed.
fn settle_donki(
    flr: Result<Value, FetchError>,
    cme: Result<Value, FetchError>,
    gst: Result<Value, FetchError>,
) -> Result<Value, FetchError> {
    let mut failures = 0;
    let mut last_error = None;
    let mut settle = |kind: &str, result: Result<Value, FetchError>| match result {
        Ok(v) => v,
        Err(e) => {
            warn!("DONKI {} fetch error: {}", kind, e);
            failures += 1;
            last_error = Some(e);
            Value::Array(Vec::new())
        }
    };
    let payload = json!({
        "flr": settle("FLR", flr),
        "cme": settle("CME", cme),
        "gst": settle("GST", gst),
    });

    match last_error {
        Some(e) if failures == 3 => Err(e),
        _ => Ok(payload),
    }
}

/// NeoWs closest approaches over the next week
pub struct NeoSource {
    client: NasaClient,
    days_ahead: u64,
}

impl NeoSource {
    pub fn new(client: NasaClient) -> Self {
        Self {
            client,
            days_ahead: 7,
        }
    }
}

#[async_trait]
impl SourceFetcher for NeoSource {
    fn name(&self) -> &'static str {
        "neo"
    }

    fn label(&self) -> &'static str {
        "NASA NeoWs (Near-Earth Asteroids)"
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<Value, FetchError> {
        let (from, to) = date_window(now.date_naive(), 0, self.days_ahead);
        self.client.fetch_neo_feed(&from, &to).await
    }

    fn normalize(&self, raw: &Value, _now: DateTime<Utc>) -> Result<Vec<AstronomicalEvent>, FetchError> {
        normalize::neo(raw)
    }
}

/// Latest GOES X-ray flux reading
pub struct XraySource {
    client: NoaaClient,
}

impl XraySource {
    pub fn new(client: NoaaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceFetcher for XraySource {
    fn name(&self) -> &'static str {
        "noaa"
    }

    fn label(&self) -> &'static str {
        "NOAA SWPC (GOES X-ray Flux)"
    }

    async fn fetch(&self, _now: DateTime<Utc>) -> Result<Value, FetchError> {
        self.client.fetch_xray_flux().await
    }

    fn normalize(&self, raw: &Value, _now: DateTime<Utc>) -> Result<Vec<AstronomicalEvent>, FetchError> {
        normalize::xray(raw).map(|e| e.into_iter().collect())
    }
}
