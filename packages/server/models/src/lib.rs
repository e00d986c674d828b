#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request types for the POI map server.
//!
//! The search form is a plain `application/x-www-form-urlencoded` POST.
//! Field names are shared with the HTML page through the constants below
//! so the form markup and the deserializer cannot drift apart.

use poi_map_dataset_models::FilterCriteria;
use serde::{Deserialize, Serialize};

/// Form field carrying the free-text address.
pub const ADDRESS_FIELD: &str = "input_address";
/// Form field carrying the selected category.
pub const CATEGORY_FIELD: &str = "tags-level";
/// Form field carrying the selected municipality.
pub const MUNICIPALITY_FIELD: &str = "input_gemeente";

/// A submitted search form.
///
/// Missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchForm {
    /// Address to geocode and center the map on.
    #[serde(rename = "input_address", default)]
    pub address: String,
    /// Category to filter POIs by (exact match).
    #[serde(rename = "tags-level", default)]
    pub category: String,
    /// Municipality to filter POIs by (exact match).
    #[serde(rename = "input_gemeente", default)]
    pub municipality: String,
}

impl SearchForm {
    /// The POI filter described by this form.
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.category.clone(), self.municipality.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_html_field_names() {
        let form: SearchForm = serde_json::from_value(serde_json::json!({
            "input_address": "Korenmarkt 1, Gent",
            "tags-level": "Basis",
            "input_gemeente": "Gent",
        }))
        .unwrap();
        assert_eq!(form.address, "Korenmarkt 1, Gent");
        assert_eq!(form.criteria(), FilterCriteria::new("Basis", "Gent"));
    }

    #[test]
    fn missing_fields_are_empty() {
        let form: SearchForm = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(form, SearchForm::default());
    }

    #[test]
    fn values_are_not_trimmed() {
        let form: SearchForm = serde_json::from_value(serde_json::json!({
            "tags-level": " Basis ",
        }))
        .unwrap();
        assert_eq!(form.criteria().category, " Basis ");
    }
}
