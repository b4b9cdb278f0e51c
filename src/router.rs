use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::json;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::{require_driver, require_school_admin};
use crate::modules::auth::router::init_auth_router;
use crate::modules::fuel_maintenance::router::init_fuel_maintenance_router;
use crate::modules::students::router::init_students_router;
use crate::state::AppState;

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK" }))
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest(
                    "/students",
                    init_students_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_school_admin,
                    )),
                )
                .nest(
                    "/fuel-maintenance",
                    init_fuel_maintenance_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_driver,
                    )),
                ),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
