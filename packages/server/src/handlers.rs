//! HTTP handler functions for the POI map.

use std::sync::Arc;

use actix_web::{HttpResponse, http::header::ContentType, web};
use poi_map_server_models::SearchForm;

use crate::{AppState, pages};

/// Shown on the form page when the address cannot be resolved.
pub const GEOCODE_FAILED_MESSAGE: &str = "Geocoding mislukt. Controleer het adres.";

/// `GET /`
///
/// Renders the empty search form.
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    html(pages::form_page(
        state.dataset.categories(),
        state.dataset.municipalities(),
        None,
    ))
}

/// `POST /`
///
/// Geocodes the submitted address, filters the POIs, and renders the map.
/// Falls back to the form page with an error when geocoding fails.
pub async fn search(state: web::Data<AppState>, form: web::Form<SearchForm>) -> HttpResponse {
    let form = form.into_inner();
    let categories = state.dataset.categories();
    let municipalities = state.dataset.municipalities();

    log::info!(
        "Search: category={:?} municipality={:?}",
        form.category,
        form.municipality
    );

    let Some(center) = state.geocoder.geocode(&form.address).await else {
        log::info!("Geocoding failed for address {:?}", form.address);
        return html(pages::form_page(
            categories,
            municipalities,
            Some(GEOCODE_FAILED_MESSAGE),
        ));
    };

    let pois = state.dataset.filter(&form.criteria());
    log::info!("{} POIs match the filter", pois.len());
    for poi in &pois {
        log::debug!("POI {:?} at {}", poi.name, poi.location());
    }

    let source = Arc::clone(&state.hazards);
    let hazards = match web::block(move || source.load()).await {
        Ok(Ok(hazards)) => hazards,
        Ok(Err(e)) => {
            log::error!("Failed to load hazard layer: {e}");
            return HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body("Failed to load hazard layer");
        }
        Err(e) => {
            log::error!("Hazard loading task failed: {e}");
            return HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body("Failed to load hazard layer");
        }
    };

    let map = poi_map_map::build_map(center, &hazards, pois, &form.address, &state.map_options);

    match map.to_html() {
        Ok(fragment) => html(pages::map_page(&fragment, categories, municipalities)),
        Err(e) => {
            log::error!("Failed to render map: {e}");
            HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body("Failed to render map")
        }
    }
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}
