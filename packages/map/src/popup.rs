//! Marker popup content.
//!
//! Popups are HTML. Record fields are interpolated according to
//! [`PopupContent`]: escaped by default, or verbatim when the dataset is a
//! trusted static export that may carry its own markup.

use std::borrow::Cow;

use poi_map_dataset_models::PointOfInterest;
use poi_map_geography_models::LatLon;
use poi_map_hazards_models::HazardRecord;

use crate::escape::escape_html;

/// How record fields are inserted into popup HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupContent {
    /// Fields are HTML-escaped.
    #[default]
    Escaped,
    /// Fields are inserted verbatim. Only safe for trusted data: a field
    /// containing markup is rendered as markup.
    Trusted,
}

impl PopupContent {
    fn field<'a>(self, text: &'a str) -> Cow<'a, str> {
        match self {
            Self::Escaped => escape_html(text),
            Self::Trusted => Cow::Borrowed(text),
        }
    }
}

/// `<b>{municipality}</b> {description}`
#[must_use]
pub fn hazard(record: &HazardRecord, mode: PopupContent) -> String {
    format!(
        "<b>{}</b> {}",
        mode.field(&record.municipality),
        mode.field(&record.description)
    )
}

/// `<b>{name}</b> {category}, <i>{street}</i>, <i>{municipality}</i><br><b>{link}</b>`
#[must_use]
pub fn point_of_interest(poi: &PointOfInterest, mode: PopupContent) -> String {
    format!(
        "<b>{}</b> {}, <i>{}</i>, <i>{}</i><br><b>{}</b>",
        mode.field(&poi.name),
        mode.field(&poi.category),
        mode.field(&poi.street),
        mode.field(&poi.municipality),
        mode.field(&poi.link)
    )
}

/// The searched address and its resolved coordinates.
#[must_use]
pub fn address(address: &str, location: LatLon, mode: PopupContent) -> String {
    format!(
        "<b>Jouw adres:</b><br>{}<br><b>COÖRDINATEN:</b><br>{location}",
        mode.field(address)
    )
}
