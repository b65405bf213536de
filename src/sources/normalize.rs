/// Per-feed mapping rules from native payloads to `AstronomicalEvent`
use crate::domain::{AstronomicalEvent, EventType, Icon, Severity};
use crate::errors::FetchError;
use crate::utils::{first, num, s_pick, t_pick};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

const DONKI_FLARES: usize = 3;
const DONKI_CMES: usize = 2;
const DONKI_STORMS: usize = 2;
const NEO_CLOSEST: usize = 3;
const CME_HIGH_SPEED_KMS: f64 = 1000.0;

/// Lowercase EONET category keyword, matched in order; the first hit wins
const CATEGORY_RULES: &[(&str, Severity, Icon)] = &[
    ("volcano", Severity::High, Icon::Volcano),
    ("storm", Severity::High, Icon::Storm),
    ("fire", Severity::Medium, Icon::Fire),
];
const CATEGORY_DEFAULT: (Severity, Icon) = (Severity::Medium, Icon::Earth);

/// Leading letter of a GOES flare class
const FLARE_CLASS_RULES: &[(&str, Severity)] = &[("X", Severity::High), ("M", Severity::Medium)];

/// Lower flux bound in W/m² for each class, highest first
const XRAY_CLASS_RULES: &[(f64, char, Severity)] = &[
    (1e-4, 'X', Severity::High),
    (1e-5, 'M', Severity::Medium),
    (1e-6, 'C', Severity::Low),
];

pub fn classify_category(category: &str) -> (Severity, Icon) {
    let category = category.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keyword, _, _)| category.contains(keyword))
        .map_or(CATEGORY_DEFAULT, |&(_, severity, icon)| (severity, icon))
}

pub fn flare_severity(class_type: &str) -> Severity {
    FLARE_CLASS_RULES
        .iter()
        .find(|(prefix, _)| class_type.starts_with(prefix))
        .map_or(Severity::Low, |&(_, severity)| severity)
}

pub fn xray_class(flux: f64) -> (char, Severity) {
    XRAY_CLASS_RULES
        .iter()
        .find(|(bound, _, _)| flux >= *bound)
        .map_or(('B', Severity::Low), |&(_, class, severity)| (class, severity))
}

fn array<'a>(raw: &'a Value, what: &str) -> Result<&'a Vec<Value>, FetchError> {
    raw.as_array()
        .ok_or_else(|| FetchError::Malformed(format!("{} is not an array", what)))
}

pub fn eonet(raw: &Value, now: DateTime<Utc>) -> Result<Vec<AstronomicalEvent>, FetchError> {
    let items = array(&raw["events"], "EONET events")?;

    Ok(items
        .iter()
        .filter_map(|item| {
            let Some(id) = s_pick(item, &["id"]) else {
                debug!("Skipping EONET event without id");
                return None;
            };
            let category = first(item, "categories")
                .and_then(|c| s_pick(c, &["title"]))
                .unwrap_or_else(|| "Natural Event".to_string());
            let geometry = first(item, "geometry");
            let location = geometry
                .and_then(|g| g["coordinates"].as_array())
                .filter(|c| c.len() == 2)
                .and_then(|c| Some((num(&c[1])?, num(&c[0])?)))
                .map_or_else(
                    || "Global".to_string(),
                    |(lat, lon)| format!("{:.2}°N, {:.2}°E", lat, lon),
                );
            let (severity, icon) = classify_category(&category);

            Some(AstronomicalEvent {
                id: format!("eonet-{}", id),
                kind: EventType::Planetary,
                title: s_pick(item, &["title"]).unwrap_or_else(|| category.clone()),
                description: format!("{} detected by NASA EONET. Location: {}", category, location),
                start_date: geometry.and_then(|g| t_pick(g, &["date"])).unwrap_or(now),
                end_date: None,
                visibility: "Earth".to_string(),
                severity,
                icon,
            })
        })
        .collect())
}

pub fn iss(raw: &Value) -> Result<AstronomicalEvent, FetchError> {
    let field = |key: &str| {
        num(&raw[key]).ok_or_else(|| FetchError::Malformed(format!("ISS payload missing {}", key)))
    };
    let (lat, lon) = (field("latitude")?, field("longitude")?);
    let (altitude, velocity) = (field("altitude")?, field("velocity")?);
    let start_date = t_pick(raw, &["timestamp"])
        .ok_or_else(|| FetchError::Malformed("ISS payload missing timestamp".into()))?;

    Ok(AstronomicalEvent {
        id: "iss-live".to_string(),
        kind: EventType::IssFlyover,
        title: "ISS Live Position".to_string(),
        description: format!(
            "International Space Station: Lat {:.2}°, Lon {:.2}° • Altitude: {:.0} km • Speed: {:.0} km/h",
            lat, lon, altitude, velocity
        ),
        start_date,
        end_date: None,
        visibility: "Orbiting Earth - Check spotthestation.nasa.gov for local passes".to_string(),
        severity: Severity::Low,
        icon: Icon::Satellite,
    })
}

/// Expects `{ "flr": [...], "cme": [...], "gst": [...] }`
pub fn donki(raw: &Value) -> Result<Vec<AstronomicalEvent>, FetchError> {
    let mut events = Vec::new();

    for flare in array(&raw["flr"], "DONKI FLR")?.iter().take(DONKI_FLARES) {
        let (Some(id), Some(start)) = (s_pick(flare, &["flrID"]), t_pick(flare, &["beginTime"])) else {
            continue;
        };
        let class_type = s_pick(flare, &["classType"]).unwrap_or_else(|| "?".to_string());
        let source = s_pick(flare, &["sourceLocation"]).unwrap_or_else(|| "unknown region".to_string());
        let peak = t_pick(flare, &["peakTime"])
            .map_or_else(|| "unknown".to_string(), |t| t.format("%Y-%m-%d %H:%M UTC").to_string());

        events.push(AstronomicalEvent {
            id: format!("donki-flare-{}", id),
            kind: EventType::SolarStorm,
            title: format!("Solar Flare {}", class_type),
            description: format!(
                "{} class solar flare from {}. Peak time: {}",
                class_type, source, peak
            ),
            start_date: start,
            end_date: t_pick(flare, &["endTime"]).filter(|end| *end >= start),
            visibility: "Sun".to_string(),
            severity: flare_severity(&class_type),
            icon: Icon::Sun,
        });
    }

    for cme in array(&raw["cme"], "DONKI CME")?.iter().take(DONKI_CMES) {
        let (Some(id), Some(start)) = (s_pick(cme, &["activityID"]), t_pick(cme, &["startTime"])) else {
            continue;
        };
        let speed = num(&cme["speed"]);
        let note = s_pick(cme, &["note"]).unwrap_or_else(|| "Solar material ejected from Sun.".to_string());

        events.push(AstronomicalEvent {
            id: format!("donki-cme-{}", id),
            kind: EventType::SolarStorm,
            title: "Coronal Mass Ejection".to_string(),
            description: format!(
                "CME detected with speed {} km/s. {}",
                speed.map_or_else(|| "N/A".to_string(), |s| format!("{:.0}", s)),
                note
            ),
            start_date: start,
            end_date: None,
            visibility: "Sun".to_string(),
            severity: if speed.is_some_and(|s| s > CME_HIGH_SPEED_KMS) {
                Severity::High
            } else {
                Severity::Medium
            },
            icon: Icon::Storm,
        });
    }

    for storm in array(&raw["gst"], "DONKI GST")?.iter().take(DONKI_STORMS) {
        let (Some(id), Some(start)) = (s_pick(storm, &["gstID"]), t_pick(storm, &["startTime"])) else {
            continue;
        };
        let kp = first(storm, "allKpIndex")
            .and_then(|k| num(&k["kpIndex"]))
            .map_or_else(|| "?".to_string(), |k| format!("{}", k));

        events.push(AstronomicalEvent {
            id: format!("donki-gst-{}", id),
            kind: EventType::SolarStorm,
            title: "Geomagnetic Storm".to_string(),
            description: format!(
                "G{} level geomagnetic storm. May cause aurora at high latitudes.",
                kp
            ),
            start_date: start,
            end_date: None,
            visibility: "Earth".to_string(),
            severity: Severity::Medium,
            icon: Icon::Aurora,
        });
    }

    Ok(events)
}

fn miss_distance_km(asteroid: &Value) -> f64 {
    first(asteroid, "close_approach_data")
        .and_then(|a| num(&a["miss_distance"]["kilometers"]))
        .unwrap_or(f64::INFINITY)
}

pub fn neo(raw: &Value) -> Result<Vec<AstronomicalEvent>, FetchError> {
    let by_day = raw["near_earth_objects"]
        .as_object()
        .ok_or_else(|| FetchError::Malformed("NeoWs near_earth_objects is not an object".into()))?;

    let mut asteroids: Vec<&Value> = by_day
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .collect();
    asteroids.sort_by(|a, b| miss_distance_km(a).total_cmp(&miss_distance_km(b)));

    Ok(asteroids
        .into_iter()
        .take(NEO_CLOSEST)
        .filter_map(|asteroid| {
            let id = s_pick(asteroid, &["id"])?;
            let approach = first(asteroid, "close_approach_data")?;
            let start = t_pick(approach, &["close_approach_date_full", "close_approach_date"])?;
            let km = num(&approach["miss_distance"]["kilometers"]).unwrap_or(f64::NAN);
            let lunar = num(&approach["miss_distance"]["lunar"]).unwrap_or(f64::NAN);
            let diameter = num(&asteroid["estimated_diameter"]["meters"]["estimated_diameter_max"])
                .unwrap_or(f64::NAN);
            let hazardous = asteroid["is_potentially_hazardous_asteroid"]
                .as_bool()
                .unwrap_or(false);

            Some(AstronomicalEvent {
                id: format!("neo-{}", id),
                kind: EventType::Planetary,
                title: format!(
                    "Asteroid {}",
                    s_pick(asteroid, &["name"]).unwrap_or_else(|| id.clone())
                ),
                description: format!(
                    "Close approach at {:.2} lunar distances ({:.2}M km). Diameter: ~{:.0}m. {}.",
                    lunar,
                    km / 1_000_000.0,
                    diameter,
                    if hazardous {
                        "⚠️ Potentially hazardous"
                    } else {
                        "Safe passage"
                    }
                ),
                start_date: start,
                end_date: None,
                visibility: "Near Earth".to_string(),
                severity: if hazardous { Severity::Medium } else { Severity::Low },
                icon: Icon::Asteroid,
            })
        })
        .collect())
}

/// Last reading of the flux series, if the series is not empty
pub fn xray(raw: &Value) -> Result<Option<AstronomicalEvent>, FetchError> {
    let Some(reading) = array(raw, "GOES X-ray series")?.last() else {
        return Ok(None);
    };
    let flux = num(&reading["flux"])
        .ok_or_else(|| FetchError::Malformed("X-ray reading missing flux".into()))?;
    let time_tag = s_pick(reading, &["time_tag"])
        .ok_or_else(|| FetchError::Malformed("X-ray reading missing time_tag".into()))?;
    let start = t_pick(reading, &["time_tag"])
        .ok_or_else(|| FetchError::Malformed(format!("bad X-ray time_tag {}", time_tag)))?;
    let (class, severity) = xray_class(flux);

    Ok(Some(AstronomicalEvent {
        id: format!("noaa-xray-{}", time_tag),
        kind: EventType::SolarStorm,
        title: format!("Solar {}-Class X-Ray Activity", class),
        description: format!(
            "Current X-ray flux: {:.2e} W/m². Monitored by NOAA GOES satellites.",
            flux
        ),
        start_date: start,
        end_date: None,
        visibility: "Global".to_string(),
        severity,
        icon: Icon::Sun,
    }))
}
