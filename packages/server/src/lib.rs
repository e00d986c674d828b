#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the POI map application.
//!
//! Serves a single page at `/`: a search form on GET, and on POST a
//! Leaflet map centered on the geocoded address showing every hazard and
//! the POIs matching the selected category and municipality. The POI
//! table is loaded once at startup; the hazard layer is re-read on every
//! search.

pub mod config;
mod handlers;
mod pages;

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};
use poi_map_dataset::Dataset;
use poi_map_geocoder::{Geocoder, NominatimGeocoder, service_registry};
use poi_map_hazards::{HazardSource, ShapefileHazards};
use poi_map_map::MapOptions;

pub use config::ServerConfig;
pub use handlers::GEOCODE_FAILED_MESSAGE;

/// Shared application state.
pub struct AppState {
    /// POI table loaded at startup.
    pub dataset: Dataset,
    /// Address lookup.
    pub geocoder: Arc<dyn Geocoder>,
    /// Hazard layer, loaded per request.
    pub hazards: Arc<dyn HazardSource>,
    /// Map rendering options.
    pub map_options: MapOptions,
}

/// Registers the application routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(handlers::index))
            .route(web::post().to(handlers::search)),
    );
}

/// Starts the POI map server.
///
/// Loads the POI table, sets up the Nominatim geocoder and the shapefile
/// hazard source, and runs the Actix-Web HTTP server until shutdown. The
/// caller provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Error` if the POI table cannot be loaded, the
/// HTTP client cannot be built, or the server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let dataset =
        Dataset::load(&config.dataset_path, &config.dataset_options()).map_err(std::io::Error::other)?;

    let geocoder =
        NominatimGeocoder::new(service_registry::nominatim()).map_err(std::io::Error::other)?;

    let hazards = ShapefileHazards::new(&config.hazard_path)
        .with_crs_override(config.hazard_source_proj.clone());

    let state = web::Data::new(AppState {
        dataset,
        geocoder: Arc::new(geocoder),
        hazards: Arc::new(hazards),
        map_options: config.map,
    });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
