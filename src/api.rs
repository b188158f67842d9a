use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::{self, Json};
use rocket::Request;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::auth::hash_password;
use crate::config::AppConfig;
use crate::db::{authenticate_user, create_schedule, create_user, get_all_schedules};
use crate::error::AppError;
use crate::models::Schedule;
use crate::validation::{ErrorResponse, JsonParseExt, JsonValidateExt, MessageResponse};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(required, length(min = 1))]
    username: Option<String>,
    #[validate(required, length(min = 1))]
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateScheduleRequest {
    #[validate(required, length(min = 1))]
    title: Option<String>,
    #[validate(required, length(min = 1))]
    time: Option<String>,
}

#[get("/")]
pub fn index() -> &'static str {
    "Hello! The schedule server is up and running."
}

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}

#[post("/register", data = "<registration>")]
pub async fn api_register(
    registration: Result<Json<RegisterRequest>, json::Error<'_>>,
    db: &State<Pool<Sqlite>>,
    config: &State<AppConfig>,
) -> Result<Custom<Json<MessageResponse>>, AppError> {
    let validated = registration.validated()?;
    let username = validated.username.unwrap_or_default();
    let password = validated.password.unwrap_or_default();

    let password_hash = hash_password(&password, config.bcrypt_cost).await?;
    create_user(db, &username, &password_hash).await?;

    Ok(Custom(
        Status::Created,
        Json(MessageResponse::new("Registration successful")),
    ))
}

#[post("/login", data = "<login>")]
pub async fn api_login(
    login: Result<Json<LoginRequest>, json::Error<'_>>,
    db: &State<Pool<Sqlite>>,
    config: &State<AppConfig>,
) -> Result<Json<MessageResponse>, AppError> {
    let login = login.parsed()?;

    let (Some(username), Some(password)) = (login.username, login.password) else {
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    };

    match authenticate_user(db, &username, &password, config.bcrypt_cost).await? {
        Some(user) => {
            tracing::info!(user_id = user.id, "Login succeeded");
            Ok(Json(MessageResponse::new("Login successful")))
        }
        None => Err(AppError::Authentication(INVALID_CREDENTIALS.to_string())),
    }
}

#[post("/schedules", data = "<schedule>")]
pub async fn api_create_schedule(
    schedule: Result<Json<CreateScheduleRequest>, json::Error<'_>>,
    db: &State<Pool<Sqlite>>,
    config: &State<AppConfig>,
) -> Result<Custom<Json<MessageResponse>>, AppError> {
    let validated = schedule.validated()?;
    let title = validated.title.unwrap_or_default();
    let time = validated.time.unwrap_or_default();

    // TODO: take the owner from an authenticated principal once login issues sessions.
    create_schedule(db, config.schedule_owner_id, &title, &time).await?;

    Ok(Custom(
        Status::Created,
        Json(MessageResponse::new("Schedule created successfully")),
    ))
}

#[get("/schedules")]
pub async fn api_list_schedules(
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Schedule>>, AppError> {
    let schedules = get_all_schedules(db).await?;
    Ok(Json(schedules))
}

#[catch(default)]
pub fn default_catcher(status: Status, _req: &Request) -> Custom<Json<ErrorResponse>> {
    let message = match status.code {
        404 => "Resource not found",
        400 => "Bad request",
        422 => "Invalid request body",
        500 => "Internal server error",
        _ => status.reason_lossy(),
    };

    Custom(status, Json(ErrorResponse::new(message)))
}
