use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::weather::Location;

const GEOIP_URL: &str = "https://ipapi.co/json/";

pub const FALLBACK_NAME: &str = "München";
pub const FALLBACK_LATITUDE: f64 = 48.1;
pub const FALLBACK_LONGITUDE: f64 = 11.6;

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[must_use]
pub fn fallback_location() -> Location {
    Location::new(FALLBACK_NAME, FALLBACK_LATITUDE, FALLBACK_LONGITUDE)
}

/// Looks up the caller's location from its public IP. Any failure or
/// missing coordinate yields `None`.
pub async fn detect_location_at(url: &str) -> Option<Location> {
    let client = Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .ok()?;
    let response: IpApiResponse = client
        .get(url)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?
        .json()
        .await
        .ok()?;
    let latitude = response.latitude?;
    let longitude = response.longitude?;
    let location = match response.city.filter(|c| !c.trim().is_empty()) {
        Some(name) => Location::new(name, latitude, longitude),
        None => Location::from_coords(latitude, longitude),
    };
    Some(location)
}

/// Explicit coordinates win, then IP lookup (unless disabled), then the
/// fixed fallback.
pub async fn resolve_location(
    coords: Option<(f64, f64)>,
    use_geoip: bool,
    geoip_url: Option<&str>,
) -> Location {
    if let Some((lat, lon)) = coords {
        return Location::from_coords(lat, lon);
    }
    if use_geoip {
        if let Some(location) = detect_location_at(geoip_url.unwrap_or(GEOIP_URL)).await {
            info!(name = %location.name, "location detected from ip");
            return location;
        }
        debug!("ip geolocation unavailable; using fallback location");
    }
    fallback_location()
}
