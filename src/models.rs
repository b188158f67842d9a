use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct Schedule {
    pub id: i64,
    pub title: String,
    pub time: String,
}
