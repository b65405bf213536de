/// Domain models for the application
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::data::PlanetFacts;
use crate::errors::UnknownEventType;
use crate::orbit::{OrbitalState, TimeMode, Vec3};
use std::collections::BTreeMap;
use std::str::FromStr;

pub const EVENT_STARTED: &str = "Event started";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    MeteorShower,
    SolarStorm,
    Eclipse,
    IssFlyover,
    Planetary,
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meteor_shower" => Ok(EventType::MeteorShower),
            "solar_storm" => Ok(EventType::SolarStorm),
            "eclipse" => Ok(EventType::Eclipse),
            "iss_flyover" => Ok(EventType::IssFlyover),
            "planetary" => Ok(EventType::Planetary),
            other => Err(UnknownEventType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Presentation tag, serialized as the glyph clients render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Icon {
    #[serde(rename = "🌋")]
    Volcano,
    #[serde(rename = "🌪️")]
    Storm,
    #[serde(rename = "🔥")]
    Fire,
    #[serde(rename = "🌍")]
    Earth,
    #[serde(rename = "🛰️")]
    Satellite,
    #[serde(rename = "☀️")]
    Sun,
    #[serde(rename = "🌌")]
    Aurora,
    #[serde(rename = "☄️")]
    Asteroid,
    #[serde(rename = "🪐")]
    Planet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Past,
}

/// Normalized event produced by a source fetcher
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AstronomicalEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub visibility: String,
    pub severity: Severity,
    pub icon: Icon,
}

impl AstronomicalEvent {
    pub fn status(&self, now: DateTime<Utc>) -> EventStatus {
        if now < self.start_date {
            return EventStatus::Upcoming;
        }
        match self.end_date {
            Some(end) if now <= end => EventStatus::Ongoing,
            None if now.date_naive() == self.start_date.date_naive() => EventStatus::Ongoing,
            _ => EventStatus::Past,
        }
    }

    /// Time until start as the two largest units, or [`EVENT_STARTED`]
    pub fn countdown(&self, now: DateTime<Utc>) -> String {
        let remaining = self.start_date - now;
        if remaining <= chrono::Duration::zero() {
            return EVENT_STARTED.to_string();
        }

        let days = remaining.num_days();
        let hours = remaining.num_hours() % 24;
        let minutes = remaining.num_minutes() % 60;

        if days > 0 {
            format!("{} {}", plural(days, "day"), plural(hours, "hour"))
        } else if hours > 0 {
            format!("{} {}", plural(hours, "hour"), plural(minutes, "minute"))
        } else {
            plural(minutes, "minute")
        }
    }

    /// Case-insensitive match of a body name against the text fields
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.description, &self.title, &self.visibility]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn view(&self, now: DateTime<Utc>) -> EventView<'_> {
        EventView {
            event: self,
            status: self.status(now),
            countdown: self.countdown(now),
        }
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Event as served, with status and countdown derived at serialization time
#[derive(Debug, Serialize)]
pub struct EventView<'a> {
    #[serde(flatten)]
    pub event: &'a AstronomicalEvent,
    pub status: EventStatus,
    pub countdown: String,
}

/// Cached result of one aggregation run
#[derive(Debug, Clone, PartialEq)]
pub struct EventFeed {
    pub events: Vec<AstronomicalEvent>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse<'a> {
    pub events: Vec<EventView<'a>>,
    pub last_updated: DateTime<Utc>,
    pub sources: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetEventsResponse<'a> {
    pub planet: String,
    pub events: Vec<EventView<'a>>,
    pub last_updated: DateTime<Utc>,
}

/// Astronomy Picture of the Day, reduced to what clients show
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Apod {
    pub title: Option<String>,
    pub explanation: Option<String>,
    pub url: Option<String>,
    pub hdurl: Option<String>,
    pub media_type: Option<String>,
    pub date: Option<String>,
    pub copyright: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkyPosition {
    pub constellation: &'static str,
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveData {
    pub astronomy_picture_of_day: Option<Value>,
    pub distance_from_earth: String,
    pub next_observable_event: &'static str,
    pub visibility: &'static str,
    pub sky_position: SkyPosition,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NasaImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rover: Option<String>,
    pub date: Option<String>,
}

/// Static facts merged with live data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetDetails {
    #[serde(flatten)]
    pub facts: &'static PlanetFacts,
    pub live_data: LiveData,
    pub recent_images: Vec<NasaImage>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct OrbitsResponse {
    pub mode: TimeMode,
    pub speed: f64,
    pub at: DateTime<Utc>,
    pub bodies: BTreeMap<String, OrbitalState>,
}

/// Latest state of one body with its orbit geometry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyResponse {
    pub name: String,
    pub parent: Option<String>,
    pub mode: TimeMode,
    #[serde(flatten)]
    pub state: OrbitalState,
    pub distance_from_parent: f64,
    pub distance_from_primary: f64,
    pub perihelion: Option<f64>,
    pub aphelion: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct OrbitPath {
    pub parent: String,
    pub points: Vec<Vec3>,
}

#[derive(Debug, Serialize)]
pub struct OrbitPathsResponse {
    pub segments: usize,
    pub paths: BTreeMap<String, OrbitPath>,
}

#[derive(Debug, Serialize)]
pub struct TimeResponse {
    pub mode: TimeMode,
    pub speed: f64,
    pub paused: bool,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> AstronomicalEvent {
        AstronomicalEvent {
            id: "test-1".into(),
            kind: EventType::Planetary,
            title: "Wildfire in Jupiter County".into(),
            description: "Wildfires detected by NASA EONET".into(),
            start_date: start,
            end_date: end,
            visibility: "Earth".into(),
            severity: Severity::Medium,
            icon: Icon::Fire,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_status_past_without_end_date() {
        let e = event(Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap(), None);
        assert_eq!(e.status(now()), EventStatus::Past);
    }

    #[test]
    fn test_status_same_day_without_end_is_ongoing() {
        let e = event(Utc.with_ymd_and_hms(2025, 6, 15, 1, 0, 0).unwrap(), None);
        assert_eq!(e.status(now()), EventStatus::Ongoing);
    }

    #[test]
    fn test_status_future_is_upcoming() {
        let e = event(Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 1).unwrap(), None);
        assert_eq!(e.status(now()), EventStatus::Upcoming);
    }

    #[test]
    fn test_status_with_end_date() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let running = event(start, Some(Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()));
        assert_eq!(running.status(now()), EventStatus::Ongoing);
        let over = event(start, Some(Utc.with_ymd_and_hms(2025, 6, 15, 11, 59, 59).unwrap()));
        assert_eq!(over.status(now()), EventStatus::Past);
    }

    #[test]
    fn test_countdown_hours_and_minutes() {
        let e = event(now() + chrono::Duration::minutes(90), None);
        assert_eq!(e.countdown(now()), "1 hour 30 minutes");
    }

    #[test]
    fn test_countdown_days_and_hours() {
        let e = event(now() + chrono::Duration::hours(49) + chrono::Duration::minutes(5), None);
        assert_eq!(e.countdown(now()), "2 days 1 hour");
    }

    #[test]
    fn test_countdown_minutes_only() {
        let e = event(now() + chrono::Duration::minutes(1) + chrono::Duration::seconds(30), None);
        assert_eq!(e.countdown(now()), "1 minute");
    }

    #[test]
    fn test_countdown_started() {
        let e = event(now() - chrono::Duration::minutes(5), None);
        assert_eq!(e.countdown(now()), EVENT_STARTED);
        let exact = event(now(), None);
        assert_eq!(exact.countdown(now()), EVENT_STARTED);
    }

    #[test]
    fn test_mentions_is_case_insensitive() {
        let e = event(now(), None);
        assert!(e.mentions("JUPITER"));
        assert!(e.mentions("earth"));
        assert!(!e.mentions("mars"));
    }

    #[test]
    fn test_event_type_parses_wire_names() {
        assert_eq!("meteor_shower".parse::<EventType>().unwrap(), EventType::MeteorShower);
        assert_eq!("Eclipse".parse::<EventType>().unwrap(), EventType::Eclipse);
        assert_eq!(" iss_flyover ".parse::<EventType>().unwrap(), EventType::IssFlyover);
        assert!("comet".parse::<EventType>().is_err());

        let wire = serde_json::to_value(EventType::MeteorShower).unwrap();
        assert_eq!(wire.as_str().unwrap().parse::<EventType>().unwrap(), EventType::MeteorShower);
    }

    #[test]
    fn test_view_serializes_flat_with_derived_fields() {
        let e = event(now() + chrono::Duration::minutes(90), None);
        let json = serde_json::to_value(e.view(now())).unwrap();
        assert_eq!(json["type"], "planetary");
        assert_eq!(json["status"], "upcoming");
        assert_eq!(json["countdown"], "1 hour 30 minutes");
        assert_eq!(json["icon"], "🔥");
        assert!(json.get("endDate").is_none());
    }
}
