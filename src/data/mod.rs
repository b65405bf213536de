/// Static reference data about the tracked bodies
mod planets;

pub use planets::{planet_facts, PlanetFacts};

use crate::domain::SkyPosition;
use chrono::{DateTime, Datelike, Utc};
use std::f64::consts::TAU;

/// Distance band from Earth and the unit it is quoted in
struct DistanceRange {
    min: f64,
    max: f64,
    unit: &'static str,
}

fn distance_range(body: &str) -> Option<DistanceRange> {
    let (min, max, unit) = match body {
        "sun" => (147.0, 152.0, "million km"),
        "mercury" => (77.0, 222.0, "million km"),
        "venus" => (38.0, 261.0, "million km"),
        "earth" => (0.0, 0.0, "km"),
        "mars" => (55.0, 401.0, "million km"),
        "jupiter" => (588.0, 968.0, "million km"),
        "saturn" => (1200.0, 1660.0, "million km"),
        "uranus" => (2580.0, 3150.0, "million km"),
        "neptune" => (4300.0, 4700.0, "million km"),
        "moon" => (356.0, 407.0, "thousand km"),
        _ => return None,
    };
    Some(DistanceRange { min, max, unit })
}

/// Rough distance from Earth, swinging through the band once a year
pub fn distance_from_earth(body: &str, now: DateTime<Utc>) -> String {
    let Some(range) = distance_range(body) else {
        return "Unknown".to_string();
    };
    let ratio = (now.ordinal() as f64 / 365.0 * TAU).sin() * 0.5 + 0.5;
    let current = range.min + (range.max - range.min) * ratio;
    format!("~{:.0} {}", current, range.unit)
}

pub fn next_observable_event(body: &str) -> &'static str {
    match body {
        "sun" => "Solar maximum ongoing through 2025",
        "mercury" => "Next greatest elongation: January 2026",
        "venus" => "Evening star visibility: Winter 2025",
        "earth" => "Next total solar eclipse: August 12, 2026",
        "mars" => "Next opposition: March 2025",
        "jupiter" => "Opposition: November 2025",
        "saturn" => "Opposition: September 2025",
        "uranus" => "Opposition: November 2025",
        "neptune" => "Opposition: September 2025",
        "moon" => "Next full moon: Check lunar calendar",
        _ => "Check astronomy calendar for events",
    }
}

/// Naked-eye visibility by calendar quarter
pub fn seasonal_visibility(body: &str, now: DateTime<Utc>) -> &'static str {
    let quarters: [&str; 4] = match body {
        "venus" => ["Morning star", "Evening star", "Not visible", "Evening star"],
        "mars" => ["Evening sky", "Late evening", "Not visible", "Morning sky"],
        "jupiter" => ["Late evening", "Early morning", "Not visible", "All night"],
        "saturn" => ["Evening sky", "Early evening", "Not visible", "Late evening"],
        _ => return "Best viewed with telescope",
    };
    quarters[(now.month0() / 3) as usize]
}

pub fn sky_position(body: &str) -> SkyPosition {
    let (constellation, magnitude) = match body {
        "venus" => ("Variable", -4.6),
        "mars" => ("Variable", 1.6),
        "jupiter" => ("Variable", -2.5),
        "saturn" => ("Variable", 0.6),
        "mercury" => ("Variable", -0.4),
        _ => ("N/A", 0.0),
    };
    SkyPosition {
        constellation,
        magnitude,
    }
}

#[cfg(test)]
mod tests {
    use super::planets::PLANETS;
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_distance_stays_in_band() {
        for day in [1, 90, 180, 270, 365] {
            let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(day - 1);
            let text = distance_from_earth("mars", now);
            let value: f64 = text
                .trim_start_matches('~')
                .split_whitespace()
                .next()
                .unwrap()
                .parse()
                .unwrap();
            assert!((55.0..=401.0).contains(&value), "{text}");
        }
        assert_eq!(distance_from_earth("ceres", Utc::now()), "Unknown");
    }

    #[test]
    fn test_visibility_by_quarter() {
        let july = Utc.with_ymd_and_hms(2025, 7, 4, 0, 0, 0).unwrap();
        assert_eq!(seasonal_visibility("mars", july), "Not visible");
        let nov = Utc.with_ymd_and_hms(2025, 11, 4, 0, 0, 0).unwrap();
        assert_eq!(seasonal_visibility("jupiter", nov), "All night");
        assert_eq!(seasonal_visibility("neptune", nov), "Best viewed with telescope");
    }

    #[test]
    fn test_every_fact_sheet_has_a_unique_name() {
        let mut names: Vec<&str> = PLANETS.iter().map(|p| p.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), PLANETS.len());
        assert!(planet_facts("saturn").is_some());
        assert!(planet_facts("pluto").is_none());
    }
}
