use std::{env, sync::Arc};

use colored::Colorize;
use log::{error, info};
use thiserror::Error;
use viewtube_platform::{seed, Config, Database, DatabaseError, PgDatabase, Platform, SeedError};
use viewtube_server::{run_server, ServerContext};

mod logging;

#[derive(Debug, Error)]
enum StartError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Seed(#[from] SeedError),
}

async fn start(config: Config) -> Result<(), StartError> {
    let database: Arc<dyn Database> = Arc::new(PgDatabase::new(&config.database_url).await?);
    info!("Connected to database.");

    // `viewtube --seed` fills the database with demo data and exits
    if env::args().any(|arg| arg == "--seed") {
        seed(&database).await?;
        return Ok(());
    }

    let platform = Arc::new(Platform::new(database, &config));

    run_server(ServerContext { platform }, config.port).await;

    Ok(())
}

#[tokio::main]
async fn main() {
    logging::init_logger();

    let config = Config::from_env();

    if let Err(error) = start(config).await {
        error!("{}", "viewtube failed to start!".bold().bright_red());
        error!("{}", error);
        error!(
            "{}",
            "Hint: make sure the PostgreSQL instance is running and DATABASE_URL points at it."
                .bright_black()
                .italic()
        );
    }
}
