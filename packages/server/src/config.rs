//! Server configuration from environment variables.

use std::path::PathBuf;

use poi_map_dataset::DatasetOptions;
use poi_map_map::{MapOptions, PopupContent};

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// POI table path (`POI_DATASET_PATH`).
    pub dataset_path: PathBuf,
    /// POI table field delimiter (`POI_DATASET_DELIMITER`).
    pub dataset_delimiter: u8,
    /// Hazard shapefile path (`HAZARD_SHAPEFILE_PATH`).
    pub hazard_path: PathBuf,
    /// PROJ definition of the hazard layer, overriding its `.prj`
    /// (`HAZARD_SOURCE_PROJ`).
    pub hazard_source_proj: Option<String>,
    /// Map rendering options (`MAP_ZOOM_START`, `MAP_TRUSTED_POPUPS`).
    pub map: MapOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            dataset_path: PathBuf::from("DATA/POI_aangepast.csv"),
            dataset_delimiter: b';',
            hazard_path: PathBuf::from("DATA/Gevaarlijke punten 2023.shp"),
            hazard_source_proj: None,
            map: MapOptions::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment, falling back
    /// to defaults for unset or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let dataset_delimiter = lookup("POI_DATASET_DELIMITER")
            .and_then(|d| d.as_bytes().first().copied())
            .unwrap_or(defaults.dataset_delimiter);

        let zoom_start = lookup("MAP_ZOOM_START")
            .and_then(|z| z.parse().ok())
            .unwrap_or(defaults.map.zoom_start);

        let popups = match lookup("MAP_TRUSTED_POPUPS").as_deref() {
            Some("1" | "true" | "yes") => PopupContent::Trusted,
            _ => PopupContent::Escaped,
        };

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            dataset_path: lookup("POI_DATASET_PATH").map_or(defaults.dataset_path, PathBuf::from),
            dataset_delimiter,
            hazard_path: lookup("HAZARD_SHAPEFILE_PATH").map_or(defaults.hazard_path, PathBuf::from),
            hazard_source_proj: lookup("HAZARD_SOURCE_PROJ").filter(|p| !p.trim().is_empty()),
            map: MapOptions { zoom_start, popups },
        }
    }

    /// Options for the POI table loader.
    #[must_use]
    pub fn dataset_options(&self) -> DatasetOptions {
        DatasetOptions {
            delimiter: self.dataset_delimiter,
            ..DatasetOptions::default()
        }
    }
}
