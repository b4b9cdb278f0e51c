use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{create_request, get_requests};

pub fn init_fuel_maintenance_router() -> Router<AppState> {
    Router::new().route("/requests", post(create_request).get(get_requests))
}
