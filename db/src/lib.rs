use product_service_config::Config;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::debug;

pub use sqlx::SqlitePool as DbPool;

/// Embedded schema migrations applied by [`init_db`].
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Creates a connection pool to the database specified in the passed [`product_service_config::DatabaseConfig`]
pub async fn connect_pool(config: &Config) -> Result<DbPool, Error> {
    let pool = SqlitePoolOptions::new()
        .connect(&config.database.url)
        .await?;

    Ok(pool)
}

/// Sets up the database schema by running all embedded migrations.
///
/// This is the single initialization entry point the service boot sequence calls. It is safe
/// to run against an already-migrated database; previously applied migrations are skipped.
pub async fn init_db(db_pool: &DbPool) -> Result<(), Error> {
    debug!("applying database schema migrations");
    MIGRATOR.run(db_pool).await?;

    Ok(())
}

/// Cheap connectivity check, used by the web health endpoint.
pub async fn ping(db_pool: &DbPool) -> Result<(), Error> {
    sqlx::query("select 1").execute(db_pool).await?;

    Ok(())
}

/// Errors that can occur as a result of a data layer operation.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// General database error, e.g. communicating with the database failed
    #[error("database connection failed: {0}")]
    DatabaseError(#[from] sqlx::Error),
    /// Applying the schema migrations failed.
    #[error("database schema setup failed: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}
