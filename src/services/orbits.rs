use crate::clock::Clock;
use crate::domain::{BodyResponse, OrbitPath, OrbitsResponse, TimeResponse};
use crate::errors::InvalidTimeMode;
use crate::orbit::{orbit_path, EngineState, SolarSystem, TimeControl, TimeMode, Vec3};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

struct Simulation {
    control: TimeControl,
    engine: EngineState,
}

/// Shared kinematics engine driven by incoming requests
pub struct OrbitService {
    system: SolarSystem,
    clock: Arc<dyn Clock>,
    sim: Mutex<Simulation>,
}

impl OrbitService {
    pub fn new(system: SolarSystem, clock: Arc<dyn Clock>) -> Self {
        Self {
            system,
            clock,
            sim: Mutex::new(Simulation {
                control: TimeControl::default(),
                engine: EngineState::new(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.system.contains(name)
    }

    /// Advance every body once with the current mode and publish the table
    pub async fn tick(&self) -> OrbitsResponse {
        let now = self.clock.now();
        let mut sim = self.sim.lock().await;
        let mode = sim.control.mode();
        sim.engine.tick(&self.system, mode, now);

        OrbitsResponse {
            mode,
            speed: mode.speed(),
            at: now,
            bodies: sim
                .engine
                .snapshot()
                .iter()
                .map(|(name, state)| (name.clone(), *state))
                .collect(),
        }
    }

    /// Last published state of one body; the engine ticks once if nothing
    /// has been published yet.
    pub async fn body(&self, name: &str) -> Option<BodyResponse> {
        let body = self.system.get(name)?;
        let mut sim = self.sim.lock().await;
        let mode = sim.control.mode();
        if sim.engine.state(name).is_none() {
            sim.engine.tick(&self.system, mode, self.clock.now());
        }

        let state = *sim.engine.state(name)?;
        let origin = body
            .parent()
            .and_then(|p| sim.engine.position(p))
            .unwrap_or(Vec3::ZERO);
        let orbit = body.orbit.as_ref();

        Some(BodyResponse {
            name: body.name.clone(),
            parent: body.parent().map(str::to_string),
            mode,
            state,
            distance_from_parent: state.position.distance(&origin),
            distance_from_primary: state.position.norm(),
            perihelion: orbit.map(|o| o.perihelion()),
            aphelion: orbit.map(|o| o.aphelion()),
        })
    }

    pub async fn time(&self) -> TimeResponse {
        time_response(&self.sim.lock().await.control)
    }

    pub async fn set_mode(&self, mode: TimeMode) -> TimeResponse {
        let mut sim = self.sim.lock().await;
        sim.control.set_mode(mode);
        info!("Time mode set to {}", mode);
        time_response(&sim.control)
    }

    pub async fn set_speed(&self, speed: f64) -> Result<TimeResponse, InvalidTimeMode> {
        let mut sim = self.sim.lock().await;
        let mode = sim.control.set_speed(speed)?;
        info!("Time mode set to {}", mode);
        Ok(time_response(&sim.control))
    }

    pub async fn toggle_pause(&self) -> TimeResponse {
        let mut sim = self.sim.lock().await;
        let mode = sim.control.toggle_pause();
        info!("Time mode toggled to {}", mode);
        time_response(&sim.control)
    }

    /// Orbit polylines of every orbiting body, relative to its parent
    pub fn paths(&self, segments: usize) -> BTreeMap<String, OrbitPath> {
        self.system
            .bodies()
            .iter()
            .filter_map(|body| {
                let orbit = body.orbit.as_ref()?;
                Some((
                    body.name.clone(),
                    OrbitPath {
                        parent: orbit.parent.clone(),
                        points: orbit_path(orbit, segments),
                    },
                ))
            })
            .collect()
    }
}

fn time_response(control: &TimeControl) -> TimeResponse {
    let mode = control.mode();
    TimeResponse {
        mode,
        speed: mode.speed(),
        paused: control.is_paused(),
    }
}
