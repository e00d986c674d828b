#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding adapter for the POI map.
//!
//! Converts a free-text address into a WGS84 coordinate using Nominatim /
//! `OpenStreetMap` (configured in `services/nominatim.toml`), throttled to
//! one outbound request per second across the whole process.
//!
//! The [`Geocoder`] trait exposes only `Option<LatLon>`: "not
//! found", network errors, and malformed responses all collapse to `None`
//! after being logged.

pub mod nominatim;
pub mod rate_limit;
pub mod service_registry;

use async_trait::async_trait;
use poi_map_geography_models::LatLon;
use thiserror::Error;

pub use nominatim::NominatimGeocoder;
pub use rate_limit::RateLimiter;

/// A geocoding result with coordinates and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// The matched/canonical address returned by the geocoder.
    pub matched_address: Option<String>,
}

impl GeocodedAddress {
    /// Returns the coordinate pair.
    #[must_use]
    pub const fn location(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Address-to-coordinate lookup.
///
/// Implementations swallow their own errors: the caller only learns
/// whether a coordinate was found.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves `address` to a coordinate, or `None` if it could not be
    /// resolved for any reason.
    async fn geocode(&self, address: &str) -> Option<LatLon>;
}
