// CLI module for operations run directly against the database

pub mod admin;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::config::BootstrapSettings;

/// Academic portal backend
#[derive(Parser)]
#[command(name = "academic-portal")]
#[command(about = "Academic portal backend: courses, enrollments, grades and feedback", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create an admin account
    CreateAdmin {
        /// Email address the admin signs in with
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long)]
        name: String,
    },
}

/// Execute a one-shot CLI command
///
/// `Serve` is handled by the binary itself; passing it here is a no-op.
pub async fn execute_command(
    command: Commands,
    settings: &BootstrapSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve => {}
        Commands::Migrate => {
            migrate::run_migrations(settings).await?;
        }
        Commands::CreateAdmin { email, name } => {
            admin::create_admin(settings, &email, &name).await?;
        }
    }

    Ok(())
}
