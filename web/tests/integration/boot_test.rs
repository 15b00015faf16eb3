use std::sync::{Arc, Mutex};

use product_service_config::{Config, DatabaseConfig};
use product_service_web::app::{BANNER_WIDTH, INIT_FAILURE_EXIT_CODE, banner, initialize_service};
use tracing_subscriber::fmt::MakeWriter;

use crate::test_config;

/// Collects formatted log output so tests can assert on what the boot
/// sequence emitted and in which order.
#[derive(Clone, Default)]
struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    fn contents(&self) -> String {
        String::from_utf8(self.buf.lock().unwrap().clone()).expect("captured logs were not utf-8")
    }
}

impl std::io::Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs(level: tracing::Level) -> (CaptureWriter, tracing::subscriber::DefaultGuard) {
    let writer = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_max_level(level)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);

    (writer, guard)
}

fn config_with_db_url(url: &str) -> Config {
    let mut config = test_config();
    config.database = DatabaseConfig {
        url: url.to_string(),
    };
    config
}

#[test]
fn banner_is_three_fixed_rows() {
    let [top, title, bottom] = banner();

    assert_eq!(top, "*".repeat(BANNER_WIDTH));
    assert_eq!(bottom, "*".repeat(BANNER_WIDTH));
    assert_eq!(
        title,
        "**********  P R O D U C T   S E R V I C E   R U N N I N G  ***********"
    );

    for row in banner() {
        assert_eq!(row.chars().count(), BANNER_WIDTH);
    }
}

#[tokio::test]
async fn banner_is_logged_before_database_init() {
    let (writer, _guard) = capture_logs(tracing::Level::DEBUG);

    let pool = initialize_service(&test_config())
        .await
        .expect("initialization should succeed");
    pool.close().await;

    let logs = writer.contents();
    let banner_at = logs
        .find(&"*".repeat(BANNER_WIDTH))
        .expect("banner was not logged");
    let migrate_at = logs
        .find("applying database schema migrations")
        .expect("schema setup was not logged");
    let ready_at = logs
        .find("Service initialized!")
        .expect("readiness line was not logged");
    assert!(banner_at < migrate_at);
    assert!(migrate_at < ready_at);
    assert_eq!(logs.matches("Service initialized!").count(), 1);
}

#[tokio::test]
async fn failed_connection_yields_supervisor_exit_code() {
    let (writer, _guard) = capture_logs(tracing::Level::INFO);

    // No create-if-missing on the pool, so a fresh path cannot be connected to.
    let config = config_with_db_url("sqlite:///definitely-missing-dir/nope.db");

    let exit = initialize_service(&config).await;

    assert_eq!(exit.err(), Some(INIT_FAILURE_EXIT_CODE));
    assert_eq!(INIT_FAILURE_EXIT_CODE, 4);

    let logs = writer.contents();
    assert!(logs.contains("Cannot continue"));
    assert_eq!(logs.matches("ERROR").count(), 1);
    assert!(!logs.contains("Service initialized!"));
}

#[tokio::test]
async fn failed_schema_setup_yields_supervisor_exit_code() {
    let (writer, _guard) = capture_logs(tracing::Level::INFO);

    let path = std::env::temp_dir().join(format!("product-service-corrupt-{}.db", std::process::id()));
    std::fs::write(&path, "this is not a sqlite database").expect("failed to write fixture file");
    let config = config_with_db_url(&format!("sqlite://{}", path.display()));

    let exit = initialize_service(&config).await;

    let _ = std::fs::remove_file(&path);

    assert_eq!(exit.err(), Some(INIT_FAILURE_EXIT_CODE));

    let logs = writer.contents();
    assert!(logs.contains("Cannot continue"));
    assert!(!logs.contains("Service initialized!"));
}

#[tokio::test]
async fn initialization_is_idempotent() {
    let (_writer, _guard) = capture_logs(tracing::Level::INFO);

    let path = std::env::temp_dir().join(format!("product-service-idempotent-{}.db", std::process::id()));
    std::fs::File::create(&path).expect("failed to create database file");
    let config = config_with_db_url(&format!("sqlite://{}", path.display()));

    let first = initialize_service(&config)
        .await
        .expect("first initialization should succeed");
    first.close().await;

    let second = initialize_service(&config)
        .await
        .expect("re-initialization should succeed");
    second.close().await;

    let _ = std::fs::remove_file(&path);
}
