use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

use crate::{error::Result, state::AppState};

pub struct HomeController;

impl HomeController {
    pub fn router() -> Router<AppState> {
        Router::new().route("/", get(HomeController::index))
    }

    /// Root endpoint returning service metadata.
    pub async fn index(State(state): State<AppState>) -> Result<Json<Value>> {
        Ok(Json(json!({
            "name": state.config.app.name,
            "version": env!("CARGO_PKG_VERSION"),
        })))
    }
}
