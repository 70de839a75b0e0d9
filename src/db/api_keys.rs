//! Database operations for API keys using SeaORM.

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::{api_key, user};
use crate::error::AppResult;
use crate::models::{ApiKey, ApiKeyOwner, CurrentUser};

impl super::DbPool {
    /// Insert a new API key.
    pub async fn insert_api_key(&self, key: &ApiKey) -> AppResult<()> {
        let model = api_key::ActiveModel {
            id: Set(key.id),
            user_id: Set(key.user_id),
            key_hash: Set(key.key_hash.clone()),
            key_prefix: Set(key.key_prefix.clone()),
            name: Set(key.name.clone()),
            expires_at: Set(key.expires_at),
            last_used_at: Set(key.last_used_at),
            created_at: Set(key.created_at),
            deleted_at: Set(key.deleted_at),
        };

        api_key::Entity::insert(model).exec(self.connection()).await?;

        Ok(())
    }

    /// Find an API key by its hash, together with its owning user.
    pub async fn find_api_key_owner(&self, key_hash: &str) -> AppResult<Option<ApiKeyOwner>> {
        let result = api_key::Entity::find()
            .filter(api_key::Column::KeyHash.eq(key_hash))
            .order_by_desc(api_key::Column::CreatedAt)
            .find_also_related(user::Entity)
            .one(self.connection())
            .await?;

        Ok(result.and_then(|(key, owner)| {
            owner.map(|u| ApiKeyOwner {
                key: ApiKey::from(key),
                user: CurrentUser::from(u),
            })
        }))
    }

    /// Update last used timestamp.
    pub async fn touch_api_key(&self, id: Uuid) -> AppResult<()> {
        let model = api_key::Entity::find_by_id(id)
            .one(self.connection())
            .await?;

        if let Some(m) = model {
            let mut active: api_key::ActiveModel = m.into();
            active.last_used_at = Set(Some(Utc::now()));
            active.update(self.connection()).await?;
        }

        Ok(())
    }
}
