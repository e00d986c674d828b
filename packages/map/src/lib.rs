#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive map builder.
//!
//! Produces a self-contained Leaflet fragment (a `<div>` plus the scripts
//! that populate it) that the server embeds in its result page. Markers use
//! `Leaflet.awesome-markers` for the coloured pin icons.
//!
//! [`build_map`] places markers in a fixed order: every hazard, then every
//! POI, then exactly one marker for the searched address. The address
//! marker is also raised with a z-index offset so it stays on top wherever
//! markers overlap.

pub mod escape;
pub mod popup;

use poi_map_dataset_models::PointOfInterest;
use poi_map_geography_models::LatLon;
use poi_map_hazards_models::HazardRecord;
use serde::Serialize;

pub use popup::PopupContent;

const LEAFLET_CSS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.js";
const AWESOME_MARKERS_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css";
const AWESOME_MARKERS_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js";
const FONT_AWESOME_CSS: &str =
    "https://cdn.jsdelivr.net/npm/@fortawesome/fontawesome-free@6.2.0/css/all.min.css";
const GLYPHICONS_CSS: &str =
    "https://netdna.bootstrapcdn.com/bootstrap/3.0.0/css/bootstrap-glyphicons.css";
const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Z-index offset applied to the address marker.
const ADDRESS_Z_INDEX_OFFSET: i32 = 1000;

/// Errors from rendering a map.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// Marker data could not be serialized.
    #[error("Failed to serialize map markers: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Options for [`build_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOptions {
    /// Initial zoom level.
    pub zoom_start: u8,
    /// How record fields are interpolated into popups.
    pub popups: PopupContent,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom_start: 12,
            popups: PopupContent::Escaped,
        }
    }
}

/// What a marker represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// A hazard from the shapefile layer.
    Hazard,
    /// A filtered point of interest.
    Poi,
    /// The geocoded input address.
    Address,
}

/// An awesome-markers icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    /// Glyph name without prefix (e.g. `"home"`).
    pub icon: String,
    /// Glyph set: `"fa"` (Font Awesome) or `"glyphicon"`.
    pub prefix: String,
    /// Pin colour.
    pub marker_color: String,
    /// Glyph colour.
    pub icon_color: String,
}

impl Icon {
    fn new(icon: &str, prefix: &str, marker_color: &str, icon_color: &str) -> Self {
        Self {
            icon: icon.to_string(),
            prefix: prefix.to_string(),
            marker_color: marker_color.to_string(),
            icon_color: icon_color.to_string(),
        }
    }

    /// Dark red warning triangle.
    #[must_use]
    pub fn hazard() -> Self {
        Self::new("exclamation-triangle", "fa", "darkred", "white")
    }

    /// Blue graduation cap.
    #[must_use]
    pub fn poi() -> Self {
        Self::new("graduation-cap", "fa", "blue", "white")
    }

    /// Dark blue house.
    #[must_use]
    pub fn address() -> Self {
        Self::new("home", "glyphicon", "darkblue", "white")
    }
}

/// A single map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// What the marker represents.
    pub kind: MarkerKind,
    /// Marker position.
    #[serde(serialize_with = "serialize_lat_lon")]
    pub location: LatLon,
    /// Popup HTML.
    pub popup: String,
    /// Pin icon.
    pub icon: Icon,
    /// Leaflet `zIndexOffset`.
    pub z_index_offset: i32,
}

fn serialize_lat_lon<S: serde::Serializer>(value: &LatLon, serializer: S) -> Result<S::Ok, S::Error> {
    value.to_array().serialize(serializer)
}

/// An interactive Leaflet map.
#[derive(Debug, Clone)]
pub struct LeafletMap {
    id: String,
    center: LatLon,
    zoom_start: u8,
    markers: Vec<Marker>,
}

impl LeafletMap {
    /// Creates an empty map centered on `center`.
    #[must_use]
    pub fn new(center: LatLon, zoom_start: u8) -> Self {
        Self {
            id: format!("map_{}", uuid::Uuid::new_v4().simple()),
            center,
            zoom_start,
            markers: Vec::new(),
        }
    }

    /// Appends a marker. Markers render in insertion order.
    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// The DOM id of the map element.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The map center.
    #[must_use]
    pub const fn center(&self) -> LatLon {
        self.center
    }

    /// Markers in render order.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Renders the map as an embeddable HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Serialize`] if the marker data cannot be encoded.
    pub fn to_html(&self) -> Result<String, MapError> {
        let id = escape::script_json(&self.id)?;
        let center = escape::script_json(&self.center.to_array())?;
        let markers = escape::script_json(&self.markers)?;
        let tile_url = escape::script_json(TILE_URL)?;
        let attribution = escape::script_json(TILE_ATTRIBUTION)?;

        Ok(format!(
            r#"<link rel="stylesheet" href="{LEAFLET_CSS}"/>
<link rel="stylesheet" href="{AWESOME_MARKERS_CSS}"/>
<link rel="stylesheet" href="{FONT_AWESOME_CSS}"/>
<link rel="stylesheet" href="{GLYPHICONS_CSS}"/>
<script src="{LEAFLET_JS}"></script>
<script src="{AWESOME_MARKERS_JS}"></script>
<div class="poi-map" id="{dom_id}" style="width: 100%; height: 100%; min-height: 600px;"></div>
<script>
(function () {{
  var map = L.map({id}, {{ center: {center}, zoom: {zoom} }});
  L.tileLayer({tile_url}, {{ maxZoom: 19, attribution: {attribution} }}).addTo(map);
  var markers = {markers};
  markers.forEach(function (m) {{
    var icon = L.AwesomeMarkers.icon({{
      icon: m.icon.icon,
      prefix: m.icon.prefix,
      markerColor: m.icon.markerColor,
      iconColor: m.icon.iconColor
    }});
    L.marker(m.location, {{ icon: icon, zIndexOffset: m.zIndexOffset }})
      .bindPopup(m.popup, {{ maxWidth: 300 }})
      .addTo(map);
  }});
}})();
</script>
"#,
            dom_id = escape::escape_html(&self.id),
            zoom = self.zoom_start,
        ))
    }
}

/// Builds the result map for one search.
///
/// Marker order is fixed: all `hazards`, then all `pois`, then one marker
/// for `address` at `center`. The map holds exactly
/// `hazards + pois + 1` markers.
pub fn build_map<'a>(
    center: LatLon,
    hazards: impl IntoIterator<Item = &'a HazardRecord>,
    pois: impl IntoIterator<Item = &'a PointOfInterest>,
    address: &str,
    options: &MapOptions,
) -> LeafletMap {
    let mut map = LeafletMap::new(center, options.zoom_start);

    for hazard in hazards {
        map.add_marker(Marker {
            kind: MarkerKind::Hazard,
            location: hazard.location,
            popup: popup::hazard(hazard, options.popups),
            icon: Icon::hazard(),
            z_index_offset: 0,
        });
    }

    for poi in pois {
        map.add_marker(Marker {
            kind: MarkerKind::Poi,
            location: poi.location(),
            popup: popup::point_of_interest(poi, options.popups),
            icon: Icon::poi(),
            z_index_offset: 0,
        });
    }

    map.add_marker(Marker {
        kind: MarkerKind::Address,
        location: center,
        popup: popup::address(address, center, options.popups),
        icon: Icon::address(),
        z_index_offset: ADDRESS_Z_INDEX_OFFSET,
    });

    map
}
