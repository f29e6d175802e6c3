use crate::config::{init_database, migrate_database, BootstrapSettings};

/// Run database migrations
///
/// Connects to the configured database and applies pending migrations.
/// Secrets are not required, so this runs without building AppData.
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = init_database(settings).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");

    Ok(())
}
