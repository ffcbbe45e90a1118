pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

/// Room left in a request body for the non-file multipart fields.
const FORM_FIELDS_OVERHEAD: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory Service API",
        version = "1.0.0",
        description = "Register, list, update, search and delete inventory items with optional photos"
    ),
    tags(
        (name = "Inventory", description = "Inventory item CRUD and photos"),
        (name = "Search", description = "Exact-ID lookup used by the search form"),
        (name = "Uploads", description = "Stored photo files"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes())
        .routes(utoipa_axum::routes!(handlers::uploads::serve_upload))
        .split_for_parts();

    let body_limit = usize::try_from(state.config.storage.max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_FIELDS_OVERHEAD);

    let mut router = router
        .route("/RegisterForm.html", get(handlers::forms::register_form))
        .route("/SearchForm.html", get(handlers::forms::search_form))
        .layer(DefaultBodyLimit::max(body_limit));

    if !state.config.server.cors.allow_origins.is_empty() {
        router = router.layer(cors_layer(&state.config.server.cors));
    }

    router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(config.allow_origins.iter().filter_map(|origin| {
            match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            }
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(config.max_age))
}
