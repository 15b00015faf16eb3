mod boot_test;

use std::sync::OnceLock;

use axum_test::{TestServer, TestServerBuilder};
use product_service_config::{
    AppConfig, Config, DatabaseConfig, Environment, ServerConfig, TracingConfig,
};
use product_service_db::DbPool;
use product_service_web::{app::App, state::AppState, tracing::Tracing};

fn lazy_tracing(app_state: &AppState) {
    static TRACING: OnceLock<()> = OnceLock::new();
    TRACING.get_or_init(|| Tracing::init(&app_state.config.tracing));
}

fn lazy_eyre() {
    static EYRE: OnceLock<()> = OnceLock::new();
    EYRE.get_or_init(|| color_eyre::install().expect("failed to initialize Eyre"));
}

/// A self-contained configuration snapshot so tests don't depend on config files on disk.
pub fn test_config() -> Config {
    Config {
        app: AppConfig::default(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        },
        tracing: TracingConfig {
            enable: false,
            ..TracingConfig::default()
        },
    }
}

pub async fn test_app_state(db_pool: DbPool) -> AppState {
    AppState::new(Environment::Test, test_config(), db_pool)
}

pub async fn test_request_with_db<F, Fut>(test_db: DbPool, callback: F)
where
    F: FnOnce(TestServer) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    lazy_eyre();

    // [sqlx::test] sets up a test database when running the test and cleans up afterwards
    // https://docs.rs/sqlx/latest/sqlx/attr.test.html
    let app_state = test_app_state(test_db).await;

    if std::env::var("TEST_LOG").is_ok() {
        lazy_tracing(&app_state);
    }

    let app = App::build(app_state)
        .await
        .expect("failed to boot test app");

    let config = TestServerBuilder::new()
        .transport(axum_test::Transport::HttpRandomPort)
        .default_content_type("application/json")
        .into_config();

    let server = TestServer::new_with_config(app.router, config)
        .expect("unable to parse axum test server config");

    callback(server).await;
}
