/// Business logic services layer
mod events;
mod orbits;
mod planets;

pub use events::{EventService, EventSources, Pipeline};
pub use orbits::OrbitService;
pub use planets::{ApodService, PlanetService};

#[cfg(test)]
pub(crate) use events::tests as stubs;
