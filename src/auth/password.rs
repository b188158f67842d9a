use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use rocket::tokio::task;

use crate::error::AppError;

/// One throwaway hash per cost, verified against when a username is unknown.
static DUMMY_HASHES: Lazy<Mutex<HashMap<u32, String>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Salted bcrypt hash of `password`, computed off the async workers.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// A malformed stored hash counts as a failed match.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let valid =
        task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false)).await?;
    Ok(valid)
}

async fn dummy_hash(cost: u32) -> Result<String, AppError> {
    if let Some(hash) = cached_dummy_hash(cost) {
        return Ok(hash);
    }

    let hash = hash_password("unknown-user-placeholder", cost).await?;
    let mut hashes = DUMMY_HASHES.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    Ok(hashes.entry(cost).or_insert(hash).clone())
}

fn cached_dummy_hash(cost: u32) -> Option<String> {
    DUMMY_HASHES
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&cost)
        .cloned()
}

/// Spends the same bcrypt work as a real password check, then fails.
/// Keeps an unknown username as slow to reject as a wrong password.
pub async fn reject_unknown_user(password: &str, cost: u32) -> Result<bool, AppError> {
    let hash = dummy_hash(cost).await?;
    verify_password(password, &hash).await?;
    Ok(false)
}

#[cfg(test)]
pub fn has_dummy_hash(cost: u32) -> bool {
    cached_dummy_hash(cost).is_some()
}
