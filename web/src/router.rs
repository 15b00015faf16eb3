use std::time::Duration;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    controllers::{health::HealthController, home::HomeController},
    error::Error,
    state::AppState,
};

pub fn init_router(app_state: &AppState) -> Router {
    Router::new()
        .merge(HomeController::router())
        .merge(HealthController::router())
        .fallback(not_found)
        .with_state(app_state.clone())
        .layer(ServiceBuilder::new().layer((
            TraceLayer::new_for_http(),
            // Graceful shutdown will wait for outstanding requests to complete. Add a timeout so
            // requests don't hang forever.
            TimeoutLayer::new(Duration::from_secs(10)),
        )))
}

/// Catch-all error handler registered for paths no route matches.
async fn not_found() -> Error {
    Error::NotFound
}
