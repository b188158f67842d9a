use std::sync::Once;

use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::{Client, LocalResponse};
use serde_json::Value;
use sqlx::{Pool, Sqlite};

use crate::auth::hash_password;
use crate::config::AppConfig;
use crate::database::connect_in_memory;
use crate::db::{create_schedule, create_user};
use crate::error::AppError;
use crate::init_rocket;

static INIT: Once = Once::new();
pub static STANDARD_PASSWORD: &str = "password123";

/// bcrypt's minimum cost keeps hashing cheap in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        bcrypt_cost: TEST_BCRYPT_COST,
        ..AppConfig::default()
    }
}

#[derive(Default)]
pub struct TestDbBuilder {
    users: Vec<TestUser>,
    schedules: Vec<TestSchedule>,
}

pub struct TestUser {
    pub username: String,
    pub password: String,
}

pub struct TestSchedule {
    pub title: String,
    pub time: String,
    pub owner_id: i64,
}

impl TestDbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(self, username: &str) -> Self {
        self.user_with_password(username, STANDARD_PASSWORD)
    }

    pub fn user_with_password(mut self, username: &str, password: &str) -> Self {
        self.users.push(TestUser {
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    pub fn schedule(mut self, title: &str, time: &str) -> Self {
        self.schedules.push(TestSchedule {
            title: title.to_string(),
            time: time.to_string(),
            owner_id: test_config().schedule_owner_id,
        });
        self
    }

    pub async fn build(self) -> Result<TestDb, AppError> {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter("debug")
                .with_test_writer()
                .try_init();
        });

        let pool = connect_in_memory().await?;

        for user in &self.users {
            let hashed = hash_password(&user.password, TEST_BCRYPT_COST).await?;
            create_user(&pool, &user.username, &hashed).await?;
        }

        for schedule in &self.schedules {
            create_schedule(&pool, schedule.owner_id, &schedule.title, &schedule.time).await?;
        }

        Ok(TestDb { pool })
    }
}

pub struct TestDb {
    pub pool: Pool<Sqlite>,
}

impl TestDb {
    pub async fn user_count(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn stored_password(&self, username: &str) -> Result<String, sqlx::Error> {
        let (password,): (String,) =
            sqlx::query_as("SELECT password FROM users WHERE username = ?")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(password)
    }

    pub async fn schedule_owner(&self, schedule_id: i64) -> Result<Option<i64>, sqlx::Error> {
        let (owner,): (Option<i64>,) =
            sqlx::query_as("SELECT user_id FROM schedules WHERE id = ?")
                .bind(schedule_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(owner)
    }
}

pub async fn create_empty_test_db() -> TestDb {
    TestDbBuilder::new()
        .build()
        .await
        .expect("Failed to build test database")
}

pub async fn setup_test_client(test_db: &TestDb) -> Client {
    setup_test_client_with_config(test_db, test_config()).await
}

pub async fn setup_test_client_with_config(test_db: &TestDb, config: AppConfig) -> Client {
    Client::tracked(init_rocket(test_db.pool.clone(), config))
        .await
        .expect("Failed to create Rocket client")
}

pub async fn post_json<'c>(
    client: &'c Client,
    uri: &'static str,
    body: Value,
) -> LocalResponse<'c> {
    client
        .post(uri)
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
        .await
}

/// Status and parsed JSON body of a response.
pub async fn read_json(response: LocalResponse<'_>) -> (Status, Value) {
    let status = response.status();
    let body = response.into_string().await.unwrap_or_default();
    let json = serde_json::from_str(&body).unwrap_or(Value::Null);
    (status, json)
}
