//! API Key service for generation and verification.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ApiKey, ApiKeyOwner};

/// API key prefix.
const KEY_PREFIX: &str = "cr_";
/// Length of random part of the key.
const KEY_RANDOM_LENGTH: usize = 40;
/// Length of the key prefix stored for identification.
const KEY_PREFIX_LENGTH: usize = 8;

/// Lookup of users by API key.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_api_key_hash(&self, key_hash: &str) -> AppResult<Option<ApiKeyOwner>>;

    async fn record_api_key_use(&self, key_id: Uuid) -> AppResult<()>;
}

#[async_trait]
impl UserDirectory for DbPool {
    async fn find_by_api_key_hash(&self, key_hash: &str) -> AppResult<Option<ApiKeyOwner>> {
        self.find_api_key_owner(key_hash).await
    }

    async fn record_api_key_use(&self, key_id: Uuid) -> AppResult<()> {
        self.touch_api_key(key_id).await
    }
}

/// Generate a new random API key for a user.
///
/// Returns the full key (to be shown to user once) and the key data for storage.
pub fn generate_key(user_id: Uuid, name: &str, expires_in: Option<&str>) -> (String, ApiKey) {
    // Two v4 UUIDs give 64 random hex characters; keep the first 40.
    let random_part: String = format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
    .chars()
    .take(KEY_RANDOM_LENGTH)
    .collect();

    let full_key = format!("{}{}", KEY_PREFIX, random_part);
    let key_hash = hash_key(&full_key);
    let key_prefix = full_key.chars().take(KEY_PREFIX_LENGTH).collect::<String>();
    let expires_at = expires_in.and_then(parse_duration).map(|d| Utc::now() + d);

    let api_key = ApiKey {
        id: Uuid::new_v4(),
        user_id,
        key_hash,
        key_prefix,
        name: name.to_string(),
        expires_at,
        last_used_at: None,
        created_at: Utc::now(),
        deleted_at: None,
    };

    (full_key, api_key)
}

/// Hash an API key using SHA-256.
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Parse a duration string like "365d", "30d", "1y", "6m".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    if let Some(days) = s.strip_suffix('d') {
        days.parse::<i64>().ok().and_then(Duration::try_days)
    } else if let Some(years) = s.strip_suffix('y') {
        years
            .parse::<i64>()
            .ok()
            .and_then(|y| Duration::try_days(y * 365))
    } else if let Some(months) = s.strip_suffix('m') {
        months
            .parse::<i64>()
            .ok()
            .and_then(|m| Duration::try_days(m * 30))
    } else if let Some(weeks) = s.strip_suffix('w') {
        weeks.parse::<i64>().ok().and_then(Duration::try_weeks)
    } else {
        s.parse::<i64>().ok().and_then(Duration::try_days)
    }
}

/// Verify an API key and return its owner.
///
/// Lookup only. The key's last use is recorded by [`record_use`] once the
/// request has been authorized.
pub async fn verify_key(directory: &dyn UserDirectory, key: &str) -> AppResult<ApiKeyOwner> {
    let key_hash = hash_key(key);

    let owner = directory
        .find_by_api_key_hash(&key_hash)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid API key".to_string()))?;

    if owner.key.is_revoked() {
        return Err(AppError::Unauthorized(
            "API key has been revoked".to_string(),
        ));
    }

    if owner.key.is_expired() {
        return Err(AppError::Unauthorized("API key has expired".to_string()));
    }

    Ok(owner)
}

/// Stamp the key's `last_used_at`. Failures are logged, never returned.
pub async fn record_use(directory: &dyn UserDirectory, key: &ApiKey) {
    if let Err(e) = directory.record_api_key_use(key.id).await {
        warn!(key_prefix = %key.key_prefix, "Failed to record API key use: {}", e);
    }
}

/// Create a new API key for a user and store it in the database.
pub async fn create_key(
    pool: &DbPool,
    user_id: Uuid,
    name: &str,
    expires_in: Option<&str>,
) -> AppResult<(String, ApiKey)> {
    if let Some(raw) = expires_in
        && parse_duration(raw).is_none()
    {
        return Err(AppError::InvalidInput(format!(
            "Invalid expiration '{}'. Use forms like 30d, 2w, 6m, 1y",
            raw
        )));
    }

    let (full_key, api_key) = generate_key(user_id, name, expires_in);
    pool.insert_api_key(&api_key).await?;

    Ok((full_key, api_key))
}
