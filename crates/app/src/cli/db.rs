use clap::{Args, Subcommand};
use storefront_app::database;
use tracing::info;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending migrations
    Migrate,
}

pub(crate) async fn run(command: DbCommand, database_url: &str) -> Result<(), String> {
    match command.command {
        DbSubcommand::Migrate => migrate(database_url).await,
    }
}

async fn migrate(database_url: &str) -> Result<(), String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::migrate(&pool)
        .await
        .map_err(|error| format!("failed to apply migrations: {error}"))?;

    info!("migrations applied");
    println!("migrations applied");

    Ok(())
}
