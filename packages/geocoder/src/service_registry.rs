//! Compile-time registry of geocoding service configurations.
//!
//! The geocoding provider is defined in a TOML file under `services/`.
//! The registry embeds it at compile time and exposes it via
//! [`nominatim`].

use std::time::Duration;

use serde::Deserialize;

/// A geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"nominatim"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Search endpoint URL (e.g., `"https://nominatim.openstreetmap.org/search"`).
    pub base_url: String,
    /// Minimum delay between requests in milliseconds.
    pub rate_limit_ms: u64,
    /// `User-Agent` header sent with every request. Nominatim's usage
    /// policy rejects requests without one.
    pub user_agent: String,
    /// ISO country codes to restrict results to. Empty means worldwide.
    #[serde(default)]
    pub country_codes: Vec<String>,
}

impl GeocodingService {
    /// Parses a service definition from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a [`toml::de::Error`] if the text is not a valid service
    /// definition.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::de::from_str(text)
    }

    /// The minimum interval between two outbound requests.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const NOMINATIM_TOML: &str = include_str!("../services/nominatim.toml");

/// Returns the embedded Nominatim service configuration.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (the file ships with the
/// crate, so this is caught by the tests below).
#[must_use]
pub fn nominatim() -> GeocodingService {
    GeocodingService::from_toml(NOMINATIM_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse geocoding service 'nominatim': {e}"))
}
