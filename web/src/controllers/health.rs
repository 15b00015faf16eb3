use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

use crate::{error::Result, state::AppState};

pub struct HealthController;

impl HealthController {
    pub fn router() -> Router<AppState> {
        Router::new().route("/health", get(HealthController::health))
    }

    /// Liveness probe used by the supervisor once the service is ready. Reports healthy only
    /// while the database is still reachable.
    pub async fn health(State(state): State<AppState>) -> Result<Json<Value>> {
        product_service_db::ping(&state.db_pool).await?;

        Ok(Json(json!({ "status": "OK" })))
    }
}
