#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared geographic coordinate types.
//!
//! Every coordinate that crosses a package boundary (geocoder results,
//! hazard centroids, map centers) is a [`LatLon`] in WGS84 degrees.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair in decimal degrees.
///
/// Note the field order: latitude first, matching how map widgets expect
/// their `[lat, lon]` arrays. Shapefile and GIS geometries are `(x, y)`,
/// i.e. longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl LatLon {
    /// Creates a coordinate from a latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate from GIS `(x, y)` order.
    #[must_use]
    pub const fn from_xy(x: f64, y: f64) -> Self {
        Self {
            latitude: y,
            longitude: x,
        }
    }

    /// Returns the `[lat, lon]` array form used by Leaflet.
    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for LatLon {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}
