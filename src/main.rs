#[macro_use]
extern crate rocket;

mod api;
mod auth;
mod config;
mod database;
mod db;
mod env;
mod error;
mod models;
mod telemetry;
#[cfg(test)]
mod test;
mod validation;

use api::{
    api_create_schedule, api_list_schedules, api_login, api_register, default_catcher, health,
    index,
};
use config::AppConfig;
use error::AppError;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use telemetry::{TelemetryFairing, init_tracing, shutdown_telemetry};
use thiserror::Error;

use sqlx::{Pool, Sqlite};
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Anyhow(anyhow::Error),
    #[error("{0}")]
    Figment(rocket::figment::Error),
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Error::Anyhow(value)
    }
}

impl From<rocket::figment::Error> for Error {
    fn from(value: rocket::figment::Error) -> Self {
        Error::Figment(value)
    }
}

#[launch]
async fn rocket() -> _ {
    let loaded_env_files = env::load_environment();

    init_tracing();

    match bootstrap(loaded_env_files).await {
        Ok(rocket) => rocket,
        Err(e) => {
            error!("Failed to start schedule server: {}", e);
            panic!("Startup failed: {}", e);
        }
    }
}

async fn bootstrap(
    loaded_env_files: anyhow::Result<Vec<&'static str>>,
) -> Result<Rocket<Build>, Error> {
    for env_file in loaded_env_files? {
        info!("Loaded environment from: {}", env_file);
    }

    let config = AppConfig::load()?;

    let pool = database::connect(&config).await?;
    database::run_migrations(&pool).await?;

    Ok(init_rocket(pool, config)
        .attach(AdHoc::on_shutdown("Telemetry shutdown", |_| {
            Box::pin(async { shutdown_telemetry() })
        })))
}

pub fn init_rocket(pool: Pool<Sqlite>, config: AppConfig) -> Rocket<Build> {
    info!(
        schedule_owner_id = config.schedule_owner_id,
        "Starting schedule server"
    );

    rocket::build()
        .manage(pool)
        .manage(config)
        .mount(
            "/",
            routes![
                index,
                health,
                api_register,
                api_login,
                api_create_schedule,
                api_list_schedules,
            ],
        )
        .register("/", catchers![default_catcher])
        .attach(TelemetryFairing)
}
