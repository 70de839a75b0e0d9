//! API Key model for authentication.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::CurrentUser;

/// API Key stored in database.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub id: Uuid,
    /// Owning user; the key inherits the user's role
    pub user_id: Uuid,
    /// SHA-256 hash of the full key
    pub key_hash: String,
    /// First 8 characters of the key for identification
    pub key_prefix: String,
    /// Human-readable name (e.g., "Laptop")
    pub name: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Soft delete timestamp (revoked)
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    pub fn is_revoked(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => false,
        }
    }
}

impl From<crate::entity::api_key::Model> for ApiKey {
    fn from(m: crate::entity::api_key::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            key_hash: m.key_hash,
            key_prefix: m.key_prefix,
            name: m.name,
            expires_at: m.expires_at,
            last_used_at: m.last_used_at,
            created_at: m.created_at,
            deleted_at: m.deleted_at,
        }
    }
}

/// An API key together with the user it authenticates.
#[derive(Debug, Clone)]
pub struct ApiKeyOwner {
    pub key: ApiKey,
    pub user: CurrentUser,
}
