use crate::clock::Clock;
use crate::data::planet_facts;
use crate::domain::{AstronomicalEvent, EventFeed, EventType, Icon, Severity};
use crate::errors::FetchError;
use crate::repo::{CacheRepo, KeyedCacheRepo};
use crate::sources::SourceFetcher;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Fan-out over a set of sources with per-source timeouts.
///
/// Every source is awaited regardless of how the others fare; a failed or
/// timed-out source contributes nothing.
#[derive(Debug, Clone)]
pub struct Pipeline {
    timeout: Duration,
    limit: usize,
}

impl Pipeline {
    pub fn new(timeout: Duration, limit: usize) -> Self {
        Self { timeout, limit }
    }

    async fn run(
        &self,
        source: &dyn SourceFetcher,
        now: DateTime<Utc>,
    ) -> Result<Vec<AstronomicalEvent>, FetchError> {
        let raw = timeout(self.timeout, source.fetch(now))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;
        source.normalize(&raw, now)
    }

    /// Concatenated events of every source that succeeded, in source order
    pub async fn collect(
        &self,
        sources: &[Arc<dyn SourceFetcher>],
        now: DateTime<Utc>,
    ) -> Vec<AstronomicalEvent> {
        let results = join_all(sources.iter().map(|s| self.run(s.as_ref(), now))).await;

        let mut events = Vec::new();
        let mut failed = 0;
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(batch) => events.extend(batch),
                Err(e) => {
                    failed += 1;
                    warn!("Source {} failed: {}", source.name(), e);
                }
            }
        }

        info!(
            "Collected {} events from {}/{} sources",
            events.len(),
            sources.len() - failed,
            sources.len()
        );
        events
    }

    /// Drop repeated ids (first wins), sort newest start first, cap at the limit
    pub fn finalize(&self, events: Vec<AstronomicalEvent>) -> Vec<AstronomicalEvent> {
        let mut seen = HashSet::new();
        let mut events: Vec<AstronomicalEvent> = events
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
        events.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        events.truncate(self.limit);
        events
    }

    pub async fn aggregate(
        &self,
        sources: &[Arc<dyn SourceFetcher>],
        now: DateTime<Utc>,
    ) -> Vec<AstronomicalEvent> {
        self.finalize(self.collect(sources, now).await)
    }
}

/// The configured feeds
#[derive(Clone)]
pub struct EventSources {
    pub eonet: Arc<dyn SourceFetcher>,
    pub iss: Arc<dyn SourceFetcher>,
    pub donki: Arc<dyn SourceFetcher>,
    pub neo: Arc<dyn SourceFetcher>,
    pub xray: Arc<dyn SourceFetcher>,
}

impl EventSources {
    fn general(&self) -> Vec<Arc<dyn SourceFetcher>> {
        vec![
            self.eonet.clone(),
            self.iss.clone(),
            self.donki.clone(),
            self.neo.clone(),
        ]
    }

    /// Sources whose events must mention the body to be kept
    fn filtered_for(&self, body: &str) -> Vec<Arc<dyn SourceFetcher>> {
        let mut sources = vec![self.eonet.clone(), self.iss.clone()];
        match body {
            "sun" => sources.push(self.donki.clone()),
            "earth" => sources.push(self.neo.clone()),
            _ => {}
        }
        sources
    }

    /// Body-specific sources, kept unfiltered
    fn extras_for(&self, body: &str) -> Vec<Arc<dyn SourceFetcher>> {
        match body {
            "sun" => vec![self.xray.clone()],
            _ => Vec::new(),
        }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.general().iter().map(|s| s.label()).collect()
    }
}

/// Earth also claims every planetary and ISS event
fn relates_to(event: &AstronomicalEvent, body: &str) -> bool {
    event.mentions(body)
        || (body == "earth" && matches!(event.kind, EventType::Planetary | EventType::IssFlyover))
}

fn observation_window(body: &str, now: DateTime<Utc>) -> Option<AstronomicalEvent> {
    if !matches!(body, "jupiter" | "saturn") {
        return None;
    }
    let display = planet_facts(body).map_or(body, |f| f.display_name);

    Some(AstronomicalEvent {
        id: format!("{}-position", body),
        kind: EventType::Planetary,
        title: format!("{} Observation Window", display),
        description: format!(
            "{} is currently visible in the night sky. Best viewing with telescope.",
            display
        ),
        start_date: now,
        end_date: None,
        visibility: "Global".to_string(),
        severity: Severity::Low,
        icon: Icon::Planet,
    })
}

/// Cached general and per-body event feeds
pub struct EventService {
    sources: EventSources,
    pipeline: Pipeline,
    clock: Arc<dyn Clock>,
    feed_cache: CacheRepo<EventFeed>,
    body_cache: KeyedCacheRepo<EventFeed>,
}

impl EventService {
    pub fn new(
        sources: EventSources,
        pipeline: Pipeline,
        clock: Arc<dyn Clock>,
        feed_ttl: Duration,
        body_ttl: Duration,
    ) -> Self {
        Self {
            sources,
            pipeline,
            clock,
            feed_cache: CacheRepo::new("events", feed_ttl),
            body_cache: KeyedCacheRepo::new("planet events", body_ttl),
        }
    }

    pub fn source_labels(&self) -> Vec<&'static str> {
        self.sources.labels()
    }

    /// General feed, refetched once the cached copy expires
    pub async fn latest(&self) -> EventFeed {
        let now = self.clock.now();
        if let Some(feed) = self.feed_cache.get_fresh(now).await {
            return feed;
        }

        let events = self.pipeline.aggregate(&self.sources.general(), now).await;
        let feed = EventFeed {
            events,
            fetched_at: now,
        };
        self.feed_cache.write(feed.clone(), now).await;
        feed
    }

    /// Events relating to one body. The name must already be lowercase and known.
    pub async fn for_body(&self, body: &str) -> EventFeed {
        let now = self.clock.now();
        if let Some(feed) = self.body_cache.get_fresh(body, now).await {
            return feed;
        }

        let filtered_sources = self.sources.filtered_for(body);
        let extra_sources = self.sources.extras_for(body);
        let (filtered, extras) = futures::join!(
            self.pipeline.collect(&filtered_sources, now),
            self.pipeline.collect(&extra_sources, now),
        );

        let mut events: Vec<AstronomicalEvent> = filtered
            .into_iter()
            .filter(|e| relates_to(e, body))
            .collect();
        events.extend(extras);
        events.extend(observation_window(body, now));

        let feed = EventFeed {
            events: self.pipeline.finalize(events),
            fetched_at: now,
        };
        self.body_cache.write(body, feed.clone(), now).await;
        feed
    }
}
