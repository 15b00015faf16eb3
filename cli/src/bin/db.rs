use clap::{Parser, Subcommand};
use color_eyre::{
    Result,
    eyre::{Context, ContextCompat},
};
use product_service_cli::Error;
use product_service_config::{Config, DatabaseConfig, Environment, load_config, parse_env};
use sqlx::migrate::{Migrate, Migrator};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr as _;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    match cli(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "A CLI tool to manage the project's database.", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true, help = "Choose the environment (development, test, production).", value_parser = parse_env, default_value = "development")]
    env: Environment,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Drop the database")]
    Drop,
    #[command(about = "Create the database")]
    Create,
    #[command(about = "Migrate the database")]
    Migrate,
    #[command(about = "Reset (drop, create, migrate) the database")]
    Reset,
}

async fn cli(cli: Cli) -> Result<(), Error> {
    let config: Config = load_config(&cli.env)?;

    match cli.command {
        Commands::Drop => {
            println!("Dropping {} database…", &cli.env);
            let db_name = drop(&config.database)
                .await
                .context("Could not drop database!")?;
            println!("Dropped database {} successfully.", db_name);
            Ok(())
        }
        Commands::Create => {
            println!("Creating {} database…", &cli.env);
            let db_name = create(&config.database)
                .await
                .context("Could not create database!")?;
            println!("Created database {} successfully.", db_name);
            Ok(())
        }
        Commands::Migrate => {
            println!("Migrating {} database…", &cli.env);
            let migrations = migrate(&config.database)
                .await
                .context("Could not migrate database!")?;
            println!("{} migrations applied.", migrations);
            Ok(())
        }
        Commands::Reset => {
            println!("Resetting {} database…", &cli.env);
            let db_name = reset(&config.database)
                .await
                .context("Could not reset the database!")?;
            println!("Reset database {} successfully.", db_name);
            Ok(())
        }
    }
}

fn db_connect_options(config: &DatabaseConfig) -> Result<SqliteConnectOptions, Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?;

    Ok(options)
}

async fn drop(config: &DatabaseConfig) -> Result<String, Error> {
    let options = db_connect_options(config)?;
    let db_file = options.get_filename();

    std::fs::remove_file(db_file).wrap_err("Failed to delete the SQLite database file!")?;

    let db_name = db_file.to_str().wrap_err("Failed to get database name!")?;

    Ok(String::from(db_name))
}

async fn create(config: &DatabaseConfig) -> Result<String, Error> {
    let options = db_connect_options(config)?.create_if_missing(true);
    let db_name = options
        .get_filename()
        .to_str()
        .wrap_err("Failed to get database name!")?
        .to_string();

    let connection = options
        .connect()
        .await
        .context("Failed to connect to database!")?;
    connection
        .close()
        .await
        .context("Failed to close database connection!")?;

    Ok(db_name)
}

async fn migrate(config: &DatabaseConfig) -> Result<i32, Error> {
    let migrations_path = db_package_root()?.join("migrations");
    let migrator = Migrator::new(migrations_path.as_path())
        .await
        .context("Failed to create migrator!")?;

    let mut connection = db_connect_options(config)?
        .connect()
        .await
        .context("Failed to connect to database!")?;

    connection
        .ensure_migrations_table()
        .await
        .context("Failed to ensure migrations table!")?;

    let applied_migrations: HashMap<_, _> = connection
        .list_applied_migrations()
        .await
        .context("Failed to list applied migrations!")?
        .into_iter()
        .map(|m| (m.version, m))
        .collect();

    let mut applied = 0;
    for migration in migrator.iter() {
        if !applied_migrations.contains_key(&migration.version) {
            connection
                .apply(migration)
                .await
                .context("Failed to apply migration!")?;
            println!("Applied migration {}.", migration.version);
            applied += 1;
        }
    }

    Ok(applied)
}

async fn reset(config: &DatabaseConfig) -> Result<String, Error> {
    println!("Dropping database…");
    drop(config).await?;
    println!("Recreating database…");
    let db_name = create(config).await?;
    println!("Migrating database…");
    migrate(config).await?;

    Ok(db_name)
}

fn db_package_root() -> Result<PathBuf, Error> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("db")
        .canonicalize()
        .wrap_err("Failed to locate the db package root!")?;

    Ok(root)
}
