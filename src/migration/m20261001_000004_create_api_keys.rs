//! Migration: Create api_keys table.
//!
//! API keys authenticate a user; the role comes from the owning user.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE api_keys (
                    id UUID PRIMARY KEY,
                    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    key_hash VARCHAR(64) NOT NULL,
                    key_prefix VARCHAR(12) NOT NULL,
                    name VARCHAR(100) NOT NULL,

                    expires_at TIMESTAMPTZ,
                    last_used_at TIMESTAMPTZ,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    deleted_at TIMESTAMPTZ
                );

                -- Unique constraint on key_hash for active keys only
                CREATE UNIQUE INDEX idx_api_keys_key_hash_active
                    ON api_keys(key_hash)
                    WHERE deleted_at IS NULL;

                CREATE INDEX idx_api_keys_user_id ON api_keys(user_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS api_keys CASCADE;")
            .await?;

        Ok(())
    }
}
