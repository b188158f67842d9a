use crate::{
    auth::{DbUser, User, reject_unknown_user, verify_password},
    error::AppError,
    models::Schedule,
};
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

/// Inserts a user whose password has already been hashed.
///
/// Username uniqueness is left to the `UNIQUE` constraint on `users.username`,
/// so concurrent registrations of one name cannot both succeed.
#[instrument(skip(pool, password_hash))]
pub async fn create_user(
    pool: &Pool<Sqlite>,
    username: &str,
    password_hash: &str,
) -> Result<i64, AppError> {
    info!("Creating new user");

    let res = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await;

    match res {
        Ok(res) => Ok(res.last_insert_rowid()),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
            AppError::Conflict(format!("Username '{}' already exists", username)),
        ),
        Err(err) => Err(err.into()),
    }
}

#[instrument(skip(pool))]
pub async fn find_user_by_username(
    pool: &Pool<Sqlite>,
    username: &str,
) -> Result<Option<DbUser>, AppError> {
    info!("Finding user by username");
    let user = sqlx::query_as::<_, DbUser>(
        "SELECT id, username, password FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Returns the user only when both the username exists and the password
/// matches its stored hash. Callers cannot tell which of the two failed:
/// an unknown username still pays for a bcrypt check at `bcrypt_cost`.
#[instrument(skip(pool, password))]
pub async fn authenticate_user(
    pool: &Pool<Sqlite>,
    username: &str,
    password: &str,
    bcrypt_cost: u32,
) -> Result<Option<User>, AppError> {
    info!("Authenticating user");

    match find_user_by_username(pool, username).await? {
        Some(user) => {
            if verify_password(password, user.password_hash()).await? {
                Ok(Some(User::from(user)))
            } else {
                Ok(None)
            }
        }
        _ => {
            reject_unknown_user(password, bcrypt_cost).await?;
            Ok(None)
        }
    }
}

#[instrument(skip(pool))]
pub async fn create_schedule(
    pool: &Pool<Sqlite>,
    owner_id: i64,
    title: &str,
    time: &str,
) -> Result<i64, AppError> {
    info!("Creating schedule");

    let res = sqlx::query("INSERT INTO schedules (title, time, user_id) VALUES (?, ?, ?)")
        .bind(title)
        .bind(time)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(res.last_insert_rowid())
}

#[instrument(skip(pool))]
pub async fn get_all_schedules(pool: &Pool<Sqlite>) -> Result<Vec<Schedule>, AppError> {
    info!("Fetching all schedules");

    let schedules =
        sqlx::query_as::<_, Schedule>("SELECT id, title, time FROM schedules ORDER BY id")
            .fetch_all(pool)
            .await?;

    Ok(schedules)
}
