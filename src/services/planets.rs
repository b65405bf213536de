use crate::clients::{ImageLibraryClient, NasaClient};
use crate::clock::Clock;
use crate::data::{
    distance_from_earth, next_observable_event, planet_facts, seasonal_visibility, sky_position,
};
use crate::domain::{Apod, LiveData, NasaImage, PlanetDetails};
use crate::errors::{ApiError, ApiResult};
use crate::repo::{CacheRepo, KeyedCacheRepo};
use crate::utils::{first, s_pick};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const RECENT_IMAGES: usize = 6;

/// Static planet facts enriched with live data
pub struct PlanetService {
    nasa: NasaClient,
    images: ImageLibraryClient,
    clock: Arc<dyn Clock>,
    cache: KeyedCacheRepo<PlanetDetails>,
}

impl PlanetService {
    pub fn new(
        nasa: NasaClient,
        images: ImageLibraryClient,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            nasa,
            images,
            clock,
            cache: KeyedCacheRepo::new("planet", ttl),
        }
    }

    /// Details for a lowercase body name; enrichment failures degrade to empty fields
    pub async fn details(&self, name: &str) -> ApiResult<PlanetDetails> {
        let facts = planet_facts(name)
            .ok_or_else(|| ApiError::NotFound(format!("Planet '{}' not found", name)))?;
        let now = self.clock.now();
        if let Some(details) = self.cache.get_fresh(name, now).await {
            return Ok(details);
        }

        let (apod, recent_images) =
            futures::join!(self.nasa.fetch_random_apod(), self.recent_images(name));
        let astronomy_picture_of_day = match apod {
            Ok(apod) => Some(apod),
            Err(e) => {
                warn!("Random APOD fetch error: {}", e);
                None
            }
        };

        let details = PlanetDetails {
            facts,
            live_data: LiveData {
                astronomy_picture_of_day,
                distance_from_earth: distance_from_earth(name, now),
                next_observable_event: next_observable_event(name),
                visibility: seasonal_visibility(name, now),
                sky_position: sky_position(name),
                timestamp: now,
            },
            recent_images,
            last_updated: now,
        };
        self.cache.write(name, details.clone(), now).await;
        Ok(details)
    }

    async fn recent_images(&self, name: &str) -> Vec<NasaImage> {
        let result = if name == "mars" {
            self.nasa.fetch_mars_photos().await.map(|raw| rover_photos(&raw))
        } else {
            self.images
                .search(name, RECENT_IMAGES)
                .await
                .map(|raw| library_images(&raw))
        };
        result.unwrap_or_else(|e| {
            warn!("Image fetch error for {}: {}", name, e);
            Vec::new()
        })
    }
}

fn rover_photos(raw: &Value) -> Vec<NasaImage> {
    let Some(photos) = raw["latest_photos"].as_array() else {
        return Vec::new();
    };
    photos
        .iter()
        .take(RECENT_IMAGES)
        .map(|photo| NasaImage {
            id: s_pick(photo, &["id"]),
            title: None,
            url: s_pick(photo, &["img_src"]),
            description: None,
            camera: s_pick(&photo["camera"], &["full_name", "name"]),
            rover: s_pick(&photo["rover"], &["name"]),
            date: s_pick(photo, &["earth_date"]),
        })
        .collect()
}

fn library_images(raw: &Value) -> Vec<NasaImage> {
    let Some(items) = raw["collection"]["items"].as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .take(RECENT_IMAGES)
        .map(|item| {
            let data = |key: &str| first(item, "data").and_then(|d| s_pick(d, &[key]));
            NasaImage {
                id: data("nasa_id"),
                title: data("title"),
                url: first(item, "links").and_then(|l| s_pick(l, &["href"])),
                description: data("description"),
                camera: None,
                rover: None,
                date: data("date_created"),
            }
        })
        .collect()
}

/// Astronomy Picture of the Day with a long-lived cache
pub struct ApodService {
    nasa: NasaClient,
    clock: Arc<dyn Clock>,
    cache: CacheRepo<Apod>,
}

impl ApodService {
    pub fn new(nasa: NasaClient, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            nasa,
            clock,
            cache: CacheRepo::new("apod", ttl),
        }
    }

    pub async fn today(&self) -> ApiResult<Apod> {
        let now = self.clock.now();
        if let Some(apod) = self.cache.get_fresh(now).await {
            return Ok(apod);
        }

        let raw = self.nasa.fetch_apod().await?;
        let apod = apod_from(&raw);
        self.cache.write(apod.clone(), now).await;
        Ok(apod)
    }
}

fn apod_from(raw: &Value) -> Apod {
    Apod {
        title: s_pick(raw, &["title"]),
        explanation: s_pick(raw, &["explanation"]),
        url: s_pick(raw, &["url"]),
        hdurl: s_pick(raw, &["hdurl"]),
        media_type: s_pick(raw, &["media_type"]),
        date: s_pick(raw, &["date"]),
        copyright: s_pick(raw, &["copyright"])
            .map(|c| c.trim().to_string())
            .unwrap_or_else(|| "NASA".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apod_defaults_copyright() {
        let apod = apod_from(&json!({
            "title": "The Horsehead Nebula",
            "url": "https://apod.nasa.gov/apod/image/horsehead.jpg",
            "media_type": "image",
            "date": "2025-06-15"
        }));
        assert_eq!(apod.copyright, "NASA");
        assert_eq!(apod.title.as_deref(), Some("The Horsehead Nebula"));
        assert!(apod.hdurl.is_none());

        let credited = apod_from(&json!({"copyright": "\nJane Doe\n"}));
        assert_eq!(credited.copyright, "Jane Doe");
    }

    #[test]
    fn test_rover_photos_are_capped() {
        let photo = |id: u64| {
            json!({
                "id": id,
                "img_src": format!("https://mars.nasa.gov/{}.jpg", id),
                "earth_date": "2025-06-14",
                "camera": {"name": "NAVCAM", "full_name": "Navigation Camera"},
                "rover": {"name": "Curiosity"}
            })
        };
        let raw = json!({"latest_photos": (1..=8).map(photo).collect::<Vec<_>>()});
        let images = rover_photos(&raw);

        assert_eq!(images.len(), RECENT_IMAGES);
        assert_eq!(images[0].id.as_deref(), Some("1"));
        assert_eq!(images[0].camera.as_deref(), Some("Navigation Camera"));
        assert_eq!(images[0].rover.as_deref(), Some("Curiosity"));
        assert!(rover_photos(&json!({})).is_empty());
    }

    #[test]
    fn test_library_images() {
        let raw = json!({"collection": {"items": [
            {
                "data": [{"nasa_id": "PIA22946", "title": "Jupiter's Great Red Spot", "date_created": "2019-02-12T00:00:00Z"}],
                "links": [{"href": "https://images-assets.nasa.gov/image/PIA22946/PIA22946~thumb.jpg"}]
            },
            {"data": [], "links": []}
        ]}});
        let images = library_images(&raw);

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].title.as_deref(), Some("Jupiter's Great Red Spot"));
        assert!(images[0].url.as_deref().unwrap().ends_with("thumb.jpg"));
        assert!(images[1].title.is_none());
    }
}
