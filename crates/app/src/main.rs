use std::sync::Arc;

use clap::Parser;
use migration::{Migrator, MigratorTrait};
use server::{ExpenseHub, JwtAuth, ServerState};
use settings::Database;

mod settings;

/// Budgetr API server.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Settings file, without the `.toml` extension.
    #[arg(long, default_value = "settings")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budgetr={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let auth = JwtAuth::new(&settings.auth.jwt_secret, settings.auth.token_ttl_secs)?;
    let db = parse_database(&settings.server.database).await?;

    let hub = ExpenseHub::default();
    let engine = engine::Engine::builder()
        .database(db)
        .notifier(Arc::new(hub.clone()))
        .build()?;

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let state = ServerState::new(engine, auth, hub);
    server::run_with_listener(state, &settings.server.cors_origins, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
