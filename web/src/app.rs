use product_service_config::{Config, Environment, load_config};
use product_service_db::{DbPool, connect_pool, init_db};
use tracing::{debug, error, info};

use axum::{Router, serve};
use color_eyre::Result;
use tokio::{net::TcpListener, signal};

use crate::{router::init_router, state::AppState, tracing::Tracing};

/// Exit code handed to the process supervisor when service initialization fails.
///
/// The supervisor reads 4 as "stop restarting this worker", so a bad schema or an unreachable
/// database does not put the service into a restart loop. Deployments whose supervisor uses a
/// different convention only need to change this constant.
pub const INIT_FAILURE_EXIT_CODE: i32 = 4;

/// Width of each startup banner row.
pub const BANNER_WIDTH: usize = 70;

const BANNER_TITLE: &str = "  P R O D U C T   S E R V I C E   R U N N I N G  ";

pub struct App {
    pub router: Router,
    pub app_state: AppState,
}

impl App {
    // Builds the application without running it
    // this is useful for testing purposes
    // where axum_test will run a
    // random port
    pub async fn build(app_state: AppState) -> Result<Self> {
        let router = init_router(&app_state);

        Ok(Self { router, app_state })
    }

    // Serves the application on the configured
    // ip and port.
    async fn serve(app: App) -> Result<()> {
        let listener = TcpListener::bind(&app.app_state.config.server.addr()).await?;

        debug!(
            "listening on {}:{}",
            app.app_state.config.server.host, app.app_state.config.server.port
        );

        serve(listener, app.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("server shutdown successfully");

        Ok(())
    }

    // Boots up the app on the configured binding and port.
    //
    // The startup steps run in a fixed order: the configuration snapshot is
    // loaded before anything else may read it, tracing is installed before
    // the database step so a failed outcome is observable, and the service
    // only starts accepting connections after initialization succeeded.
    pub async fn boot(env: Environment) -> Result<()> {
        color_eyre::install()?;

        let config: Config = load_config(&env)?;

        Tracing::init(&config.tracing);

        let db_pool = match initialize_service(&config).await {
            Ok(db_pool) => db_pool,
            Err(code) => std::process::exit(code),
        };

        let app = App::build(AppState::new(env, config, db_pool)).await?;

        App::serve(app).await?;

        Ok(())
    }
}

/// Runs the one-shot startup sequence: emits the banner, connects the database pool and sets
/// up the schema.
///
/// Tracing must already be installed when this runs. Initialization failure is fatal by
/// policy, and connecting counts as part of initialization: any database error is logged once
/// at the highest severity and mapped to [`INIT_FAILURE_EXIT_CODE`], which [`App::boot`]
/// passes to [`std::process::exit`]; there is no retry or partial-start mode. On success the
/// readiness line is logged and the connected pool is returned.
pub async fn initialize_service(config: &Config) -> Result<DbPool, i32> {
    for line in banner() {
        info!("{line}");
    }

    let outcome: Result<DbPool, product_service_db::Error> = async {
        let db_pool = connect_pool(config).await?;
        init_db(&db_pool).await?;

        Ok(db_pool)
    }
    .await;

    // Only "did it fail at all" matters here; error sub-kinds are not discriminated.
    match outcome {
        Ok(db_pool) => {
            info!("Service initialized!");
            Ok(db_pool)
        }
        Err(err) => {
            error!("{err}: Cannot continue");
            Err(INIT_FAILURE_EXIT_CODE)
        }
    }
}

/// The three-line startup banner, logged after tracing setup and before database
/// initialization. Each row is exactly [`BANNER_WIDTH`] characters wide.
pub fn banner() -> [String; 3] {
    let rule = "*".repeat(BANNER_WIDTH);
    let title = center(BANNER_TITLE, BANNER_WIDTH, '*');

    [rule.clone(), title, rule]
}

fn center(text: &str, width: usize, pad: char) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }

    let left = (width - len) / 2;
    let right = width - len - left;

    format!(
        "{}{}{}",
        pad.to_string().repeat(left),
        text,
        pad.to_string().repeat(right)
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
