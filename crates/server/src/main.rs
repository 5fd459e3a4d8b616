use database::db::create_connection;
use migration::{Migrator, MigratorTrait};
use server::{app, config::Config, notify::Notifier, state::AppState, utils::shutdown::shutdown_signal};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let address = config.address()?;

    let db = create_connection(&config.database_url).await?;
    if config.run_migrations {
        Migrator::up(&db, None).await?;
        log::info!("Database migrations applied");
    }

    let notifier = Notifier::new(config.whatsapp_service_url.clone())?;
    notifier.check_service().await;

    let state = AppState::new(db.clone(), config, notifier);
    let listener = tokio::net::TcpListener::bind(address).await?;
    log::info!("Running axum on http://{address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await?;
    log::info!("Server stopped");

    Ok(())
}
