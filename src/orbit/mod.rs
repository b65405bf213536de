/// Orbital kinematics: static body parameters, time modes and per-tick states
mod bodies;
mod engine;
mod time_control;

pub use bodies::solar_system;
pub use engine::{orbit_path, path_segments, EngineState, SolarSystem};
pub use time_control::TimeControl;

use crate::errors::InvalidTimeMode;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::f64::consts::TAU;
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

pub const MS_PER_HOUR: f64 = 3_600_000.0;
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// J2000.0 (JD 2451545.0, 2000-01-01T12:00:00Z) as Unix milliseconds
pub const J2000_UNIX_MS: i64 = 946_728_000_000;

/// Orbit step per tick at 1x for a body with the reference period
pub const BASE_ORBIT_SPEED: f64 = 0.01;
pub const BASE_ORBIT_PERIOD_DAYS: f64 = 365.25;

/// Spin step per tick at 1x for a body with the reference day length
pub const BASE_SPIN_SPEED: f64 = 0.02;
pub const BASE_SPIN_PERIOD_HOURS: f64 = 24.0;

pub const MIN_PATH_SEGMENTS: usize = 128;
pub const MAX_PATH_SEGMENTS: usize = 4096;

/// Days elapsed since J2000.0, negative before the epoch
pub fn days_since_j2000(now: DateTime<Utc>) -> f64 {
    (now.timestamp_millis() - J2000_UNIX_MS) as f64 / MS_PER_DAY
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: &Vec3) -> f64 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z).norm()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Global animation clock setting.
///
/// On the numeric speed scale used by clients `0` is paused, `-1` is real time
/// and any positive value is a multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeMode {
    Paused,
    Multiplier(f64),
    RealTime,
}

impl TimeMode {
    pub fn from_speed(speed: f64) -> Result<Self, InvalidTimeMode> {
        if speed == 0.0 {
            Ok(TimeMode::Paused)
        } else if speed == -1.0 {
            Ok(TimeMode::RealTime)
        } else if speed.is_finite() && speed > 0.0 {
            Ok(TimeMode::Multiplier(speed))
        } else {
            Err(InvalidTimeMode(speed.to_string()))
        }
    }

    pub fn speed(&self) -> f64 {
        match self {
            TimeMode::Paused => 0.0,
            TimeMode::Multiplier(f) => *f,
            TimeMode::RealTime => -1.0,
        }
    }
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeMode::Paused => write!(f, "paused"),
            TimeMode::Multiplier(factor) => write!(f, "{}x", factor),
            TimeMode::RealTime => write!(f, "realtime"),
        }
    }
}

impl FromStr for TimeMode {
    type Err = InvalidTimeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "paused" | "pause" => Ok(TimeMode::Paused),
            "realtime" | "real-time" | "real_time" => Ok(TimeMode::RealTime),
            other => other
                .strip_suffix('x')
                .unwrap_or(other)
                .parse::<f64>()
                .map_err(|_| InvalidTimeMode(s.clone()))
                .and_then(TimeMode::from_speed),
        }
    }
}

impl Serialize for TimeMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Direction of spin. Rotation periods are always stored as positive hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Spin {
    Prograde,
    Retrograde,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rotation {
    pub period_hours: f64,
    pub spin: Spin,
}

impl Rotation {
    pub fn prograde(period_hours: f64) -> Self {
        Self {
            period_hours,
            spin: Spin::Prograde,
        }
    }

    pub fn retrograde(period_hours: f64) -> Self {
        Self {
            period_hours,
            spin: Spin::Retrograde,
        }
    }

    /// Signed spin step per tick at 1x
    pub fn speed(&self) -> f64 {
        let speed = BASE_SPIN_SPEED * BASE_SPIN_PERIOD_HOURS / self.period_hours;
        match self.spin {
            Spin::Prograde => speed,
            Spin::Retrograde => -speed,
        }
    }

    pub fn real_time_angle(&self, now: DateTime<Utc>) -> f64 {
        let period_ms = self.period_hours * MS_PER_HOUR;
        let fraction = (now.timestamp_millis() as f64).rem_euclid(period_ms) / period_ms;
        let angle = fraction * TAU;
        match self.spin {
            Spin::Prograde => angle,
            Spin::Retrograde => (-angle).rem_euclid(TAU),
        }
    }
}

/// Elliptical orbit around `parent`, which sits at one focus
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    pub parent: String,
    /// Semi-major axis in scene units
    pub distance: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub period_days: f64,
    pub initial_phase: f64,
}

impl Orbit {
    pub fn new(parent: &str, distance: f64, eccentricity: f64, inclination_deg: f64, period_days: f64) -> Self {
        Self {
            parent: parent.to_string(),
            distance,
            eccentricity,
            inclination_deg,
            period_days,
            initial_phase: 0.0,
        }
    }

    pub fn with_phase(mut self, initial_phase: f64) -> Self {
        self.initial_phase = initial_phase;
        self
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.distance * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    pub fn focal_offset(&self) -> f64 {
        self.distance * self.eccentricity
    }

    pub fn perihelion(&self) -> f64 {
        self.distance * (1.0 - self.eccentricity)
    }

    pub fn aphelion(&self) -> f64 {
        self.distance * (1.0 + self.eccentricity)
    }

    /// Orbit step per tick at 1x, derived from the period
    pub fn angular_velocity(&self) -> f64 {
        BASE_ORBIT_SPEED * BASE_ORBIT_PERIOD_DAYS / self.period_days
    }

    /// Absolute phase for the given instant
    pub fn real_time_phase(&self, now: DateTime<Utc>) -> f64 {
        let turns = (days_since_j2000(now) / self.period_days).rem_euclid(1.0);
        (turns * TAU + self.initial_phase).rem_euclid(TAU)
    }

    /// Position relative to the parent for an orbital angle.
    ///
    /// The ellipse lies in the x/z plane and is tilted about the x axis by the
    /// inclination.
    pub fn position_at(&self, angle: f64) -> Vec3 {
        let a = self.distance;
        let b = self.semi_minor_axis();
        let c = self.focal_offset();
        let incl = self.inclination_deg.to_radians();

        let x = a * angle.cos() - c;
        let z = b * angle.sin();
        Vec3::new(x, z * incl.sin(), z * incl.cos())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalBody {
    pub name: String,
    pub size: f64,
    /// `None` for the primary
    pub orbit: Option<Orbit>,
    pub rotation: Rotation,
}

impl OrbitalBody {
    pub fn primary(name: &str, size: f64, rotation: Rotation) -> Self {
        Self {
            name: name.to_string(),
            size,
            orbit: None,
            rotation,
        }
    }

    pub fn orbiting(name: &str, size: f64, orbit: Orbit, rotation: Rotation) -> Self {
        Self {
            name: name.to_string(),
            size,
            orbit: Some(orbit),
            rotation,
        }
    }

    pub fn parent(&self) -> Option<&str> {
        self.orbit.as_ref().map(|o| o.parent.as_str())
    }
}

/// Latest published state of one body, in the primary-centered frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitalState {
    pub position: Vec3,
    pub rotation_angle: f64,
}
