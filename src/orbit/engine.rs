use super::{OrbitalBody, OrbitalState, Orbit, TimeMode, Vec3, MAX_PATH_SEGMENTS, MIN_PATH_SEGMENTS};
use crate::errors::ConfigError;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;
use tracing::debug;

/// Validated body table with a parent-before-child tick order
#[derive(Debug, Clone)]
pub struct SolarSystem {
    bodies: Vec<OrbitalBody>,
    order: Vec<usize>,
}

impl SolarSystem {
    pub fn new(bodies: Vec<OrbitalBody>) -> Result<Self, ConfigError> {
        let mut names = HashSet::new();
        for body in &bodies {
            validate_body(body)?;
            if !names.insert(body.name.as_str()) {
                return Err(ConfigError::DuplicateBody(body.name.clone()));
            }
        }

        let index: HashMap<&str, usize> = bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.as_str(), i))
            .collect();

        // Depth in the parent chain decides the tick order.
        let mut depths = Vec::with_capacity(bodies.len());
        for body in &bodies {
            let mut depth = 0usize;
            let mut current = body;
            while let Some(parent) = current.parent() {
                let &i = index.get(parent).ok_or_else(|| ConfigError::UnknownParent {
                    name: current.name.clone(),
                    parent: parent.to_string(),
                })?;
                depth += 1;
                if depth > bodies.len() {
                    return Err(ConfigError::ParentCycle(body.name.clone()));
                }
                current = &bodies[i];
            }
            depths.push(depth);
        }

        let mut order: Vec<usize> = (0..bodies.len()).collect();
        order.sort_by_key(|&i| depths[i]);

        Ok(Self { bodies, order })
    }

    pub fn bodies(&self) -> &[OrbitalBody] {
        &self.bodies
    }

    pub fn get(&self, name: &str) -> Option<&OrbitalBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Bodies ordered so that every parent precedes its children
    pub fn tick_order(&self) -> impl Iterator<Item = &OrbitalBody> {
        self.order.iter().map(move |&i| &self.bodies[i])
    }
}

fn validate_body(body: &OrbitalBody) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidBody {
        name: body.name.clone(),
        reason: reason.to_string(),
    };

    if body.name.trim().is_empty() {
        return Err(invalid("empty name"));
    }
    if !(body.rotation.period_hours.is_finite() && body.rotation.period_hours > 0.0) {
        return Err(invalid("rotation period must be positive"));
    }
    if let Some(orbit) = &body.orbit {
        if orbit.parent == body.name {
            return Err(ConfigError::ParentCycle(body.name.clone()));
        }
        if !(orbit.period_days.is_finite() && orbit.period_days > 0.0) {
            return Err(invalid("orbital period must be positive"));
        }
        if !(orbit.distance.is_finite() && orbit.distance >= 0.0) {
            return Err(invalid("distance must be non-negative"));
        }
        if !(0.0..1.0).contains(&orbit.eccentricity) {
            return Err(invalid("eccentricity must be in [0, 1)"));
        }
        if !orbit.inclination_deg.is_finite() || !orbit.initial_phase.is_finite() {
            return Err(invalid("inclination and phase must be finite"));
        }
    }
    Ok(())
}

/// Orbit and spin angles carried between ticks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Accumulator {
    pub orbit_angle: f64,
    pub spin_angle: f64,
}

impl Accumulator {
    fn seed(body: &OrbitalBody) -> Self {
        Self {
            orbit_angle: body.orbit.as_ref().map_or(0.0, |o| o.initial_phase),
            spin_angle: 0.0,
        }
    }
}

/// Result of advancing one body by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    pub angles: Accumulator,
    /// Relative to the body's parent
    pub local_position: Vec3,
    pub rotation_angle: f64,
}

/// Advance a single body by one tick.
///
/// Real time ignores `previous` entirely; paused returns it unchanged and a
/// multiplier steps it by the body's angular velocities.
pub fn advance(
    body: &OrbitalBody,
    mode: TimeMode,
    now: DateTime<Utc>,
    previous: Accumulator,
) -> Advance {
    let angles = match mode {
        TimeMode::RealTime => Accumulator {
            orbit_angle: body.orbit.as_ref().map_or(0.0, |o| o.real_time_phase(now)),
            spin_angle: body.rotation.real_time_angle(now),
        },
        TimeMode::Paused => previous,
        TimeMode::Multiplier(factor) => {
            let omega = body.orbit.as_ref().map_or(0.0, Orbit::angular_velocity);
            Accumulator {
                orbit_angle: (previous.orbit_angle + omega * factor).rem_euclid(TAU),
                spin_angle: (previous.spin_angle + body.rotation.speed() * factor).rem_euclid(TAU),
            }
        }
    };

    let local_position = body
        .orbit
        .as_ref()
        .map_or(Vec3::ZERO, |o| o.position_at(angles.orbit_angle));

    Advance {
        angles,
        local_position,
        rotation_angle: angles.spin_angle,
    }
}

/// Per-body accumulators plus the last published states.
///
/// Confined to whichever task drives the ticks; shared users wrap it in a lock.
#[derive(Debug, Default)]
pub struct EngineState {
    accumulators: HashMap<String, Accumulator>,
    published: HashMap<String, OrbitalState>,
    last_mode: Option<TimeMode>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every body once and publish the new states.
    ///
    /// Real-time ticks overwrite the accumulators with the absolute angles, so
    /// leaving real time continues from the last real-time phase.
    pub fn tick(&mut self, system: &SolarSystem, mode: TimeMode, now: DateTime<Utc>) {
        if self.last_mode != Some(mode) {
            debug!("Time mode changed: {:?} -> {}", self.last_mode, mode);
        }

        for body in system.tick_order() {
            let previous = self
                .accumulators
                .get(&body.name)
                .copied()
                .unwrap_or_else(|| Accumulator::seed(body));
            let step = advance(body, mode, now, previous);

            let origin = body
                .parent()
                .and_then(|p| self.published.get(p))
                .map_or(Vec3::ZERO, |s| s.position);

            self.accumulators.insert(body.name.clone(), step.angles);
            self.published.insert(
                body.name.clone(),
                OrbitalState {
                    position: origin + step.local_position,
                    rotation_angle: step.rotation_angle,
                },
            );
        }

        self.last_mode = Some(mode);
    }

    pub fn state(&self, name: &str) -> Option<&OrbitalState> {
        self.published.get(name)
    }

    pub fn position(&self, name: &str) -> Option<Vec3> {
        self.published.get(name).map(|s| s.position)
    }

    pub fn snapshot(&self) -> &HashMap<String, OrbitalState> {
        &self.published
    }
}

/// Segment count actually drawn for a requested resolution
pub fn path_segments(requested: usize) -> usize {
    requested.clamp(MIN_PATH_SEGMENTS, MAX_PATH_SEGMENTS)
}

/// Closed polyline of an orbit relative to its parent, first point repeated last
pub fn orbit_path(orbit: &Orbit, segments: usize) -> Vec<Vec3> {
    let segments = path_segments(segments);
    (0..=segments)
        .map(|i| orbit.position_at(i as f64 / segments as f64 * TAU))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::{solar_system, Rotation, J2000_UNIX_MS, MS_PER_DAY};
    use chrono::TimeZone;

    fn system() -> SolarSystem {
        SolarSystem::new(solar_system()).unwrap()
    }

    fn j2000() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(J2000_UNIX_MS).unwrap()
    }

    #[test]
    fn test_builtin_table_is_valid() {
        let system = system();
        assert!(system.contains("earth"));
        assert!(system.contains("moon"));
        assert!(!system.contains("pluto"));
    }

    #[test]
    fn test_tick_order_puts_parents_first() {
        let system = system();
        let order: Vec<&str> = system.tick_order().map(|b| b.name.as_str()).collect();
        let pos = |n: &str| order.iter().position(|x| *x == n).unwrap();
        assert_eq!(order[0], "sun");
        assert!(pos("earth") < pos("moon"));
        assert!(pos("earth") < pos("iss"));
    }

    #[test]
    fn test_child_listed_before_parent_still_ticks_after() {
        let bodies = vec![
            OrbitalBody::orbiting("moon", 0.2, Orbit::new("earth", 2.0, 0.0, 0.0, 27.0), Rotation::prograde(600.0)),
            OrbitalBody::orbiting("earth", 1.0, Orbit::new("sun", 16.0, 0.0, 0.0, 365.0), Rotation::prograde(24.0)),
            OrbitalBody::primary("sun", 3.0, Rotation::prograde(600.0)),
        ];
        let system = SolarSystem::new(bodies).unwrap();
        let mut engine = EngineState::new();
        engine.tick(&system, TimeMode::Paused, j2000());
        let moon = engine.position("moon").unwrap();
        assert!((moon.x - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_positive_period() {
        let bodies = vec![
            OrbitalBody::primary("sun", 3.0, Rotation::prograde(600.0)),
            OrbitalBody::orbiting("bad", 1.0, Orbit::new("sun", 10.0, 0.0, 0.0, 0.0), Rotation::prograde(24.0)),
        ];
        assert!(matches!(
            SolarSystem::new(bodies),
            Err(ConfigError::InvalidBody { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_eccentricity_and_distance() {
        let ecc = vec![OrbitalBody::orbiting("x", 1.0, Orbit::new("sun", 10.0, 1.0, 0.0, 10.0), Rotation::prograde(24.0))];
        assert!(SolarSystem::new(ecc).is_err());
        let dist = vec![OrbitalBody::orbiting("x", 1.0, Orbit::new("sun", -1.0, 0.1, 0.0, 10.0), Rotation::prograde(24.0))];
        assert!(SolarSystem::new(dist).is_err());
    }

    #[test]
    fn test_rejects_duplicates_unknown_parents_and_cycles() {
        let dup = vec![
            OrbitalBody::primary("sun", 3.0, Rotation::prograde(600.0)),
            OrbitalBody::primary("sun", 3.0, Rotation::prograde(600.0)),
        ];
        assert!(matches!(SolarSystem::new(dup), Err(ConfigError::DuplicateBody(_))));

        let orphan = vec![OrbitalBody::orbiting("moon", 0.2, Orbit::new("earth", 2.0, 0.0, 0.0, 27.0), Rotation::prograde(600.0))];
        assert!(matches!(SolarSystem::new(orphan), Err(ConfigError::UnknownParent { .. })));

        let cycle = vec![
            OrbitalBody::orbiting("a", 1.0, Orbit::new("b", 2.0, 0.0, 0.0, 27.0), Rotation::prograde(24.0)),
            OrbitalBody::orbiting("b", 1.0, Orbit::new("a", 2.0, 0.0, 0.0, 27.0), Rotation::prograde(24.0)),
        ];
        assert!(matches!(SolarSystem::new(cycle), Err(ConfigError::ParentCycle(_))));
    }

    #[test]
    fn test_earth_real_time_scenario() {
        let system = system();
        let mut engine = EngineState::new();

        engine.tick(&system, TimeMode::RealTime, j2000());
        let p = engine.position("earth").unwrap();
        assert!((p.x - 16.0 * (1.0 - 0.017)).abs() < 1e-6, "{p:?}");
        assert!(p.y.abs() < 1e-6 && p.z.abs() < 1e-6);

        let half_year = j2000() + chrono::Duration::milliseconds((182.625 * MS_PER_DAY) as i64);
        engine.tick(&system, TimeMode::RealTime, half_year);
        let p = engine.position("earth").unwrap();
        assert!((p.x + 16.0 * (1.0 + 0.017)).abs() < 1e-6, "{p:?}");
        assert!(p.z.abs() < 1e-6);
    }

    #[test]
    fn test_real_time_is_deterministic_and_ignores_accumulator() {
        let system = system();
        let mars = system.get("mars").unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        let a = advance(mars, TimeMode::RealTime, now, Accumulator::default());
        let b = advance(
            mars,
            TimeMode::RealTime,
            now,
            Accumulator {
                orbit_angle: 2.0,
                spin_angle: 1.0,
            },
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_paused_keeps_previous_angles() {
        let system = system();
        let earth = system.get("earth").unwrap();
        let previous = Accumulator {
            orbit_angle: 1.25,
            spin_angle: 0.5,
        };
        let step = advance(earth, TimeMode::Paused, j2000(), previous);
        assert_eq!(step.angles, previous);
    }

    #[test]
    fn test_multiplier_scales_step() {
        let system = system();
        let earth = system.get("earth").unwrap();
        let step = advance(earth, TimeMode::Multiplier(5.0), j2000(), Accumulator::default());
        assert!((step.angles.orbit_angle - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_switch_out_of_real_time_does_not_jump() {
        let system = system();
        let mut engine = EngineState::new();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        // Build up a stale accumulator first, then go real time.
        for _ in 0..50 {
            engine.tick(&system, TimeMode::Multiplier(10.0), now);
        }
        engine.tick(&system, TimeMode::RealTime, now);
        let before = engine.position("mars").unwrap();

        engine.tick(&system, TimeMode::Multiplier(1.0), now);
        let after = engine.position("mars").unwrap();

        let orbit = system.get("mars").unwrap().orbit.clone().unwrap();
        let max_step = orbit.angular_velocity() * orbit.aphelion();
        assert!(before.distance(&after) <= max_step + 1e-9);
    }

    #[test]
    fn test_pause_after_real_time_holds_last_real_time_position() {
        let system = system();
        let mut engine = EngineState::new();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        engine.tick(&system, TimeMode::RealTime, now);
        let held = *engine.state("jupiter").unwrap();

        engine.tick(&system, TimeMode::Paused, now + chrono::Duration::hours(6));
        assert_eq!(*engine.state("jupiter").unwrap(), held);
    }

    #[test]
    fn test_moon_follows_earth() {
        let system = system();
        let mut engine = EngineState::new();
        engine.tick(&system, TimeMode::Multiplier(3.0), j2000());

        let earth = engine.position("earth").unwrap();
        let moon = engine.position("moon").unwrap();
        let orbit = system.get("moon").unwrap().orbit.clone().unwrap();
        let r = earth.distance(&moon);
        assert!(r >= orbit.perihelion() - 1e-9 && r <= orbit.aphelion() + 1e-9);
    }

    #[test]
    fn test_snapshot_covers_every_body() {
        let system = system();
        let mut engine = EngineState::new();
        engine.tick(&system, TimeMode::RealTime, j2000());
        assert_eq!(engine.snapshot().len(), system.bodies().len());
        assert_eq!(engine.position("sun"), Some(Vec3::ZERO));
    }

    #[test]
    fn test_orbit_path_matches_live_position() {
        let system = system();
        let orbit = system.get("pallas").unwrap().orbit.clone().unwrap();
        let path = orbit_path(&orbit, 16);
        assert_eq!(path.len(), MIN_PATH_SEGMENTS + 1);
        assert!(path[0].distance(&path[MIN_PATH_SEGMENTS]) < 1e-9);

        let quarter = orbit.position_at(TAU / 4.0);
        assert!(path[MIN_PATH_SEGMENTS / 4].distance(&quarter) < 1e-9);
    }

    #[test]
    fn test_orbit_path_caps_resolution() {
        let system = system();
        let orbit = system.get("earth").unwrap().orbit.clone().unwrap();
        assert_eq!(path_segments(usize::MAX), MAX_PATH_SEGMENTS);
        assert_eq!(path_segments(500), 500);

        let path = orbit_path(&orbit, usize::MAX);
        assert_eq!(path.len(), MAX_PATH_SEGMENTS + 1);
    }
}
