use super::{Orbit, OrbitalBody, Rotation};

/// Tracked bodies in scene units.
///
/// Semi-major axes are visually compressed; periods, eccentricities and
/// inclinations are the real values.
pub fn solar_system() -> Vec<OrbitalBody> {
    vec![
        OrbitalBody::primary("sun", 3.0, Rotation::prograde(609.12)),
        // Planets
        OrbitalBody::orbiting(
            "mercury",
            0.38,
            Orbit::new("sun", 8.0, 0.2056, 7.0, 87.97),
            Rotation::prograde(1407.6),
        ),
        OrbitalBody::orbiting(
            "venus",
            0.95,
            Orbit::new("sun", 12.0, 0.0068, 3.39, 224.7),
            Rotation::retrograde(5832.5),
        ),
        OrbitalBody::orbiting(
            "earth",
            1.0,
            Orbit::new("sun", 16.0, 0.017, 0.0, 365.25),
            Rotation::prograde(23.934),
        ),
        OrbitalBody::orbiting(
            "mars",
            0.53,
            Orbit::new("sun", 20.0, 0.0934, 1.85, 686.98),
            Rotation::prograde(24.62),
        ),
        OrbitalBody::orbiting(
            "jupiter",
            2.5,
            Orbit::new("sun", 32.0, 0.0489, 1.3, 4332.59),
            Rotation::prograde(9.925),
        ),
        OrbitalBody::orbiting(
            "saturn",
            2.2,
            Orbit::new("sun", 42.0, 0.0565, 2.49, 10759.22),
            Rotation::prograde(10.656),
        ),
        OrbitalBody::orbiting(
            "uranus",
            1.6,
            Orbit::new("sun", 52.0, 0.0457, 0.77, 30688.5),
            Rotation::retrograde(17.24),
        ),
        OrbitalBody::orbiting(
            "neptune",
            1.5,
            Orbit::new("sun", 60.0, 0.0113, 1.77, 60182.0),
            Rotation::prograde(16.11),
        ),
        // Dwarf planets and large asteroids, spread around the belt
        OrbitalBody::orbiting(
            "ceres",
            0.2,
            Orbit::new("sun", 26.0, 0.0758, 10.59, 1680.0).with_phase(0.8),
            Rotation::prograde(9.07),
        ),
        OrbitalBody::orbiting(
            "vesta",
            0.15,
            Orbit::new("sun", 24.0, 0.0887, 7.14, 1325.75).with_phase(2.4),
            Rotation::prograde(5.34),
        ),
        OrbitalBody::orbiting(
            "pallas",
            0.15,
            Orbit::new("sun", 27.0, 0.231, 34.8, 1686.0).with_phase(4.0),
            Rotation::prograde(7.81),
        ),
        OrbitalBody::orbiting(
            "hygiea",
            0.13,
            Orbit::new("sun", 28.0, 0.112, 3.83, 2031.0).with_phase(5.3),
            Rotation::prograde(13.8),
        ),
        // Satellites and spacecraft
        OrbitalBody::orbiting(
            "moon",
            0.27,
            Orbit::new("earth", 2.5, 0.0549, 5.145, 27.32),
            Rotation::prograde(655.7),
        ),
        OrbitalBody::orbiting(
            "iss",
            0.05,
            Orbit::new("earth", 1.3, 0.0005, 51.64, 0.0644),
            Rotation::prograde(1.545),
        ),
        OrbitalBody::orbiting(
            "parker",
            0.03,
            Orbit::new("sun", 3.0, 0.0, 3.4, 88.0),
            Rotation::prograde(24.0),
        ),
    ]
}
