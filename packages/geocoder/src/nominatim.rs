//! Nominatim / OpenStreetMap geocoder client.
//!
//! Nominatim has strict rate limits: **1 request per second** maximum on
//! the public instance. [`NominatimGeocoder`] owns a single
//! [`RateLimiter`] and is meant to be shared (behind an `Arc`) by every
//! request handler in the process.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use async_trait::async_trait;
use poi_map_geography_models::LatLon;

use crate::rate_limit::RateLimiter;
use crate::service_registry::GeocodingService;
use crate::{GeocodeError, GeocodedAddress, Geocoder};

/// Geocodes a free-form query using Nominatim.
///
/// The caller is responsible for rate limiting (see `rate_limit_ms` in the
/// service TOML configuration).
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode_freeform(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
    country_codes: &[String],
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let mut params = vec![
        ("q", query.to_string()),
        ("format", "jsonv2".to_string()),
        ("limit", "1".to_string()),
    ];
    if !country_codes.is_empty() {
        params.push(("countrycodes", country_codes.join(",")));
    }

    let resp = client.get(base_url).query(&params).send().await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.error_for_status()?.json().await?;
    parse_response(&body)
}

/// Parses Nominatim JSON response.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let lon = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    let display_name = first["display_name"].as_str().map(String::from);

    Ok(Some(GeocodedAddress {
        latitude: lat,
        longitude: lon,
        matched_address: display_name,
    }))
}

/// A rate-limited Nominatim client implementing [`Geocoder`].
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    service: GeocodingService,
    limiter: RateLimiter,
}

impl NominatimGeocoder {
    /// Builds a client for `service`, sending its configured `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(service: GeocodingService) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(service.user_agent.as_str())
            .build()?;
        let limiter = RateLimiter::new(service.min_interval());

        log::info!(
            "Geocoder '{}' at {} (min interval {}ms)",
            service.name,
            service.base_url,
            service.rate_limit_ms
        );

        Ok(Self {
            client,
            service,
            limiter,
        })
    }

    /// Performs one rate-limited lookup, keeping the error detail.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request fails, the service reports
    /// rate limiting, or the response cannot be parsed.
    pub async fn lookup(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        self.limiter.until_ready().await;
        geocode_freeform(
            &self.client,
            &self.service.base_url,
            query,
            &self.service.country_codes,
        )
        .await
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Option<LatLon> {
        if address.trim().is_empty() {
            log::debug!("Skipping geocode of blank address");
            return None;
        }

        match self.lookup(address).await {
            Ok(Some(geocoded)) => {
                log::debug!(
                    "Geocoded '{address}' to {} ({:?})",
                    geocoded.location(),
                    geocoded.matched_address
                );
                Some(geocoded.location())
            }
            Ok(None) => {
                log::info!("Nominatim: no match for '{address}'");
                None
            }
            Err(e) => {
                log::warn!("Error occurred during geocoding of '{address}': {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_service() -> GeocodingService {
        GeocodingService {
            id: "test".to_string(),
            name: "Unreachable".to_string(),
            // Port 1 is reserved; connecting fails immediately.
            base_url: "http://127.0.0.1:1/search".to_string(),
            rate_limit_ms: 0,
            user_agent: "poi_map_tests".to_string(),
            country_codes: Vec::new(),
        }
    }

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "51.0538286",
            "lon": "3.7250121",
            "display_name": "Gent, Oost-Vlaanderen, Vlaanderen, België"
        }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.latitude - 51.053_828_6).abs() < 1e-6);
        assert!((result.longitude - 3.725_012_1).abs() < 1e-6);
        assert_eq!(
            result.matched_address.as_deref(),
            Some("Gent, Oost-Vlaanderen, Vlaanderen, België")
        );
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn rejects_non_array_body() {
        let body = serde_json::json!({ "error": "Bad request" });
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_result_without_coordinates() {
        let body = serde_json::json!([{ "display_name": "nowhere" }]);
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn blank_address_is_absent() {
        let geocoder = NominatimGeocoder::new(unreachable_service()).unwrap();
        assert_eq!(geocoder.geocode("").await, None);
        assert_eq!(geocoder.geocode("   ").await, None);
    }

    #[tokio::test]
    async fn network_failure_collapses_to_absent() {
        let geocoder = NominatimGeocoder::new(unreachable_service()).unwrap();
        assert!(matches!(
            geocoder.lookup("Korenmarkt, Gent").await,
            Err(GeocodeError::Http(_))
        ));
        assert_eq!(geocoder.geocode("Korenmarkt, Gent").await, None);
    }
}
