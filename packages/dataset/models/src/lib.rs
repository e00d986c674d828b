#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Point-of-interest record and filter types.
//!
//! These are the in-memory rows of the POI table loaded at startup. They
//! are separate from the loader so the map renderer and server can depend
//! on them without pulling in the CSV stack.

use poi_map_geography_models::LatLon;
use serde::{Deserialize, Serialize};

/// A single point of interest from the POI table.
///
/// Uniqueness is not enforced: duplicate names and coordinates are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    /// Display name.
    pub name: String,
    /// Category (e.g. an education level).
    pub category: String,
    /// Municipality the POI belongs to.
    pub municipality: String,
    /// Street address.
    pub street: String,
    /// External link (usually a website).
    pub link: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

impl PointOfInterest {
    /// Returns the POI position.
    #[must_use]
    pub const fn location(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }
}

/// Exact-match filter on category and municipality.
///
/// No trimming or case folding is applied: `"Gent"` does not match
/// `"gent"` or `"Gent "`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Required category value.
    pub category: String,
    /// Required municipality value.
    pub municipality: String,
}

impl FilterCriteria {
    /// Creates a new filter.
    #[must_use]
    pub fn new(category: impl Into<String>, municipality: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            municipality: municipality.into(),
        }
    }

    /// Whether `poi` satisfies both criteria.
    #[must_use]
    pub fn matches(&self, poi: &PointOfInterest) -> bool {
        poi.category == self.category && poi.municipality == self.municipality
    }
}
