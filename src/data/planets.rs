use serde::Serialize;

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickFacts {
    pub diameter: &'static str,
    pub distance_from_sun: &'static str,
    pub orbital_period: &'static str,
    pub rotation_period: &'static str,
    pub moons: &'static str,
    pub surface_temperature: &'static str,
    pub mass: &'static str,
    pub gravity: &'static str,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetFacts {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub quick_facts: QuickFacts,
    pub composition: &'static str,
    pub atmosphere: &'static [&'static str],
    pub notable_features: &'static [&'static str],
}

pub fn planet_facts(name: &str) -> Option<&'static PlanetFacts> {
    PLANETS.iter().find(|p| p.name == name)
}

pub static PLANETS: &[PlanetFacts] = &[
    PlanetFacts {
        name: "sun",
        display_name: "The Sun",
        description: "The star at the center of our Solar System, a nearly perfect sphere of hot plasma that provides light and heat to Earth.",
        quick_facts: QuickFacts {
            diameter: "1,391,000 km",
            distance_from_sun: "0 km (center)",
            orbital_period: "N/A",
            rotation_period: "~25 days (equator)",
            moons: "0",
            surface_temperature: "~5,500°C",
            mass: "1.989 × 10³⁰ kg",
            gravity: "274 m/s²",
        },
        composition: "Primarily hydrogen (73%) and helium (25%), with trace amounts of heavier elements",
        atmosphere: &["Hydrogen 73%", "Helium 25%", "Oxygen 0.8%", "Carbon 0.3%"],
        notable_features: &[
            "Nuclear fusion occurs in its core",
            "Solar flares and coronal mass ejections affect Earth",
            "Has an 11-year solar activity cycle",
        ],
    },
    PlanetFacts {
        name: "mercury",
        display_name: "Mercury",
        description: "The smallest planet in our Solar System and the closest to the Sun, with extreme temperature variations.",
        quick_facts: QuickFacts {
            diameter: "4,879 km",
            distance_from_sun: "57.9 million km",
            orbital_period: "88 Earth days",
            rotation_period: "59 Earth days",
            moons: "0",
            surface_temperature: "-173°C to 427°C",
            mass: "3.30 × 10²³ kg",
            gravity: "3.7 m/s²",
        },
        composition: "Rocky planet with a large iron core (about 75% of the planet's diameter)",
        atmosphere: &["Oxygen (trace)", "Sodium", "Hydrogen", "Helium", "Potassium"],
        notable_features: &[
            "Has the most eccentric orbit of all planets",
            "Surface heavily cratered like the Moon",
            "Greatest temperature range of any planet",
        ],
    },
    PlanetFacts {
        name: "venus",
        display_name: "Venus",
        description: "The hottest planet in our Solar System, known for its thick toxic atmosphere and extreme greenhouse effect.",
        quick_facts: QuickFacts {
            diameter: "12,104 km",
            distance_from_sun: "108.2 million km",
            orbital_period: "225 Earth days",
            rotation_period: "243 Earth days (retrograde)",
            moons: "0",
            surface_temperature: "~462°C",
            mass: "4.87 × 10²⁴ kg",
            gravity: "8.87 m/s²",
        },
        composition: "Rocky planet with dense atmosphere dominated by carbon dioxide and sulfuric acid clouds",
        atmosphere: &["Carbon Dioxide 96.5%", "Nitrogen 3.5%", "Sulfur Dioxide traces"],
        notable_features: &[
            "Rotates backwards (retrograde rotation)",
            "A day is longer than its year",
            "Surface pressure 92 times that of Earth",
        ],
    },
    PlanetFacts {
        name: "earth",
        display_name: "Earth",
        description: "The only known planet to harbor life, with oceans covering 71% of its surface and a protective atmosphere.",
        quick_facts: QuickFacts {
            diameter: "12,742 km",
            distance_from_sun: "149.6 million km",
            orbital_period: "365.25 days",
            rotation_period: "24 hours",
            moons: "1 (The Moon)",
            surface_temperature: "-88°C to 58°C",
            mass: "5.97 × 10²⁴ kg",
            gravity: "9.81 m/s²",
        },
        composition: "Rocky planet with iron core, silicate mantle, and crust covered by water and continents",
        atmosphere: &["Nitrogen 78%", "Oxygen 21%", "Argon 0.9%", "Carbon Dioxide 0.04%"],
        notable_features: &[
            "Only known planet with life",
            "Protected by magnetic field and ozone layer",
            "Active plate tectonics shape the surface",
        ],
    },
    PlanetFacts {
        name: "mars",
        display_name: "Mars",
        description: "The Red Planet, colored by iron oxide, and the focus of many exploration missions.",
        quick_facts: QuickFacts {
            diameter: "6,779 km",
            distance_from_sun: "227.9 million km",
            orbital_period: "687 Earth days",
            rotation_period: "24.6 hours",
            moons: "2 (Phobos, Deimos)",
            surface_temperature: "-153°C to 20°C",
            mass: "6.42 × 10²³ kg",
            gravity: "3.71 m/s²",
        },
        composition: "Rocky planet with iron oxide-rich soil and a thin carbon dioxide atmosphere",
        atmosphere: &["Carbon Dioxide 95.3%", "Nitrogen 2.7%", "Argon 1.6%", "Oxygen 0.13%"],
        notable_features: &[
            "Home to Olympus Mons, largest volcano in the Solar System",
            "Valles Marineris canyon system stretches 4,000 km",
            "Multiple rovers currently exploring the surface",
        ],
    },
    PlanetFacts {
        name: "jupiter",
        display_name: "Jupiter",
        description: "The largest planet in our Solar System, a gas giant with a powerful magnetic field and the Great Red Spot.",
        quick_facts: QuickFacts {
            diameter: "139,820 km",
            distance_from_sun: "778.5 million km",
            orbital_period: "11.9 Earth years",
            rotation_period: "9.9 hours",
            moons: "95+ known moons",
            surface_temperature: "-145°C (cloud tops)",
            mass: "1.898 × 10²⁷ kg",
            gravity: "24.79 m/s²",
        },
        composition: "Gas giant primarily composed of hydrogen and helium with no solid surface",
        atmosphere: &["Hydrogen 90%", "Helium 10%", "Methane", "Ammonia"],
        notable_features: &[
            "Great Red Spot, a storm larger than Earth",
            "Ganymede is the largest moon in the Solar System",
            "Magnetic field extends millions of kilometers",
        ],
    },
    PlanetFacts {
        name: "saturn",
        display_name: "Saturn",
        description: "Famous for its spectacular ring system, the most extensive and complex in our Solar System.",
        quick_facts: QuickFacts {
            diameter: "116,460 km",
            distance_from_sun: "1.43 billion km",
            orbital_period: "29.5 Earth years",
            rotation_period: "10.7 hours",
            moons: "146+ known moons",
            surface_temperature: "-178°C (cloud tops)",
            mass: "5.68 × 10²⁶ kg",
            gravity: "10.44 m/s²",
        },
        composition: "Gas giant with an extensive ring system made of ice and rock",
        atmosphere: &["Hydrogen 96%", "Helium 3%", "Methane", "Ammonia"],
        notable_features: &[
            "Rings made of billions of ice and rock particles",
            "Titan has liquid methane lakes",
            "Hexagonal storm at the north pole",
        ],
    },
    PlanetFacts {
        name: "uranus",
        display_name: "Uranus",
        description: "An ice giant that rotates on its side, giving it extreme seasons lasting decades.",
        quick_facts: QuickFacts {
            diameter: "50,724 km",
            distance_from_sun: "2.87 billion km",
            orbital_period: "84 Earth years",
            rotation_period: "17.2 hours (retrograde)",
            moons: "27+ known moons",
            surface_temperature: "-224°C",
            mass: "8.68 × 10²⁵ kg",
            gravity: "8.87 m/s²",
        },
        composition: "Ice giant with hydrogen, helium and methane giving it a blue-green color",
        atmosphere: &["Hydrogen 83%", "Helium 15%", "Methane 2%"],
        notable_features: &[
            "Rotates on its side (98° axial tilt)",
            "Coldest planetary atmosphere in the Solar System",
            "First planet discovered with a telescope (1781)",
        ],
    },
    PlanetFacts {
        name: "neptune",
        display_name: "Neptune",
        description: "The most distant planet from the Sun, a dark, cold ice giant with the fastest winds in the Solar System.",
        quick_facts: QuickFacts {
            diameter: "49,244 km",
            distance_from_sun: "4.5 billion km",
            orbital_period: "165 Earth years",
            rotation_period: "16.1 hours",
            moons: "16+ known moons",
            surface_temperature: "-214°C",
            mass: "1.02 × 10²⁶ kg",
            gravity: "11.15 m/s²",
        },
        composition: "Ice giant with a deep blue color from methane absorption",
        atmosphere: &["Hydrogen 80%", "Helium 19%", "Methane 1.5%"],
        notable_features: &[
            "Winds up to 2,100 km/h",
            "Triton, its largest moon, is geologically active",
            "Discovered through mathematical prediction",
        ],
    },
    PlanetFacts {
        name: "moon",
        display_name: "The Moon",
        description: "Earth's only natural satellite, which drives the tides and has been visited by humans.",
        quick_facts: QuickFacts {
            diameter: "3,474 km",
            distance_from_sun: "~149.6 million km (orbits Earth)",
            orbital_period: "27.3 days (around Earth)",
            rotation_period: "27.3 days (tidally locked)",
            moons: "0",
            surface_temperature: "-173°C to 127°C",
            mass: "7.35 × 10²² kg",
            gravity: "1.62 m/s²",
        },
        composition: "Rocky body with an ancient, heavily cratered surface and no atmosphere",
        atmosphere: &["Virtually none"],
        notable_features: &[
            "Only celestial body visited by humans",
            "Always shows the same face to Earth",
            "Water ice in permanently shadowed craters",
        ],
    },
];
