use rocket::figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Application settings layered on top of Rocket's own configuration.
///
/// Values come from `Rocket.toml`, `ROCKET_*` environment variables and a raw
/// `DATABASE_URL`, in increasing order of precedence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct AppConfig {
    pub database_url: String,
    /// Owner stamped on every new schedule. There is no authenticated
    /// principal yet, so the service runs in single-tenant mode.
    pub schedule_owner_id: i64,
    /// Range accepted by bcrypt itself.
    #[validate(range(min = 4, max = 31))]
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://schedule.db".to_string(),
            schedule_owner_id: 1,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(rocket::Config::figment())
            .merge(Env::raw().only(&["database_url"]).global())
    }

    /// Fails at startup on settings that would otherwise only break requests.
    pub fn load() -> Result<Self, rocket::figment::Error> {
        let config: Self = Self::figment().extract()?;
        config.validate().map_err(|err| {
            rocket::figment::Error::from(format!("Invalid configuration: {}", err))
        })?;
        Ok(config)
    }
}
