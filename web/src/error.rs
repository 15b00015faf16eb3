use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use color_eyre::eyre;
use serde_json::json;
use tracing::error;

pub type Result<T, E = Error> = color_eyre::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No route matched the request path.
    ///
    /// Return a `404 Not Found` response.
    #[error("not found")]
    NotFound,
    /// An error occured while interacting with the database.
    ///
    /// Return `500 Internal Server Error` on a db error.
    #[error("an error occured while interacting with the database")]
    Database(#[from] product_service_db::Error),
    /// Enumerate any possible app errors here.
    ///
    /// Return `500 Internal Server Error` on a `eyre::Error`.
    #[error("Error: {0}")]
    Unexpected(#[from] eyre::Error),
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => {
                return (self.status_code(), Json(json!({ "error": "not found" })))
                    .into_response();
            }
            Error::Database(ref err) => {
                error!(
                    "an error occured while interacting with the database: {:?}",
                    err
                );
            }
            Error::Unexpected(ref err) => {
                error!("an internal server error occured: {:?}", err);
            }
        }

        self.status_code().into_response()
    }
}
