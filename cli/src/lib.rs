//! The product_service_cli crate implements the project's admin CLI tool `db` for managing the
//! service's database outside of the normal boot sequence.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] product_service_config::Error),
    #[error("Database error")]
    Database(#[from] sqlx::Error),
    #[error("Filesystem io error")]
    Io(#[from] std::io::Error),
    #[error("Other error")]
    Other(#[from] color_eyre::Report),
}
