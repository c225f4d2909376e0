use crate::domain::cafe::Cafe;
use crate::transport::http::handlers::{cafes, health, pages};
use crate::transport::http::types::{
    AddCafeResponse, AppState, CafeResponse, CafesResponse, ErrorEnvelope, HealthResponse,
    SuccessResponse,
};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        cafes::all_cafes_handler,
        cafes::random_cafe_handler,
        cafes::search_cafes_handler,
        cafes::add_cafe_handler,
        cafes::update_price_handler,
        cafes::delete_cafe_handler
    ),
    components(schemas(
        Cafe,
        CafesResponse,
        CafeResponse,
        SuccessResponse,
        AddCafeResponse,
        ErrorEnvelope,
        HealthResponse
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home_handler))
        .route(
            "/add",
            get(pages::add_form_handler).post(pages::add_submit_handler),
        )
        .route("/documentation", get(pages::documentation_handler))
        .route("/health", get(health::healthcheck_handler))
        .route("/cafe/all", get(cafes::all_cafes_handler))
        .route("/cafe/random", get(cafes::random_cafe_handler))
        .route("/cafe/search", get(cafes::search_cafes_handler))
        .route("/cafe/add", post(cafes::add_cafe_handler))
        .route("/cafe/update-price/:id", patch(cafes::update_price_handler))
        .route("/cafe/report-closed/:id", delete(cafes::delete_cafe_handler))
        .with_state(app_state)
}

/// The full application: routes, Swagger UI, CORS and request tracing.
pub fn create_app(app_state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
