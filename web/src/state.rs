use product_service_config::{Config, Environment};
use product_service_db::DbPool;

/// The application's state that is available in [`crate::controllers`].
///
/// Assembled exactly once per process, after initialization has connected the database pool;
/// the configuration snapshot is immutable after load.
#[derive(Clone)]
pub struct AppState {
    pub env: Environment,
    pub config: Config,
    pub db_pool: DbPool,
}

impl AppState {
    pub fn new(env: Environment, config: Config, db_pool: DbPool) -> Self {
        Self {
            env,
            config,
            db_pool,
        }
    }
}
