#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hazard record type.
//!
//! A hazard is one feature of the "dangerous locations" shapefile, reduced
//! to its WGS84 centroid for display.

use poi_map_geography_models::LatLon;
use serde::{Deserialize, Serialize};

/// A dangerous location from the hazard layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardRecord {
    /// Municipality the hazard lies in.
    pub municipality: String,
    /// Free-text description.
    pub description: String,
    /// Centroid of the feature geometry (WGS84).
    pub location: LatLon,
}
