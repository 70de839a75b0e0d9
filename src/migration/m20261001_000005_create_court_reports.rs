//! Migration: Create court_reports table.
//!
//! One row per case describing its current report attachment in S3.
//! The unique case index enforces a single current attachment.

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
                CREATE TABLE court_reports (
                    id UUID PRIMARY KEY,
                    casa_case_id UUID NOT NULL REFERENCES casa_cases(id) ON DELETE CASCADE,
                    filename VARCHAR(255) NOT NULL,
                    storage_key VARCHAR(500) NOT NULL,
                    content_type VARCHAR(255) NOT NULL,
                    byte_size BIGINT NOT NULL CHECK (byte_size >= 0),
                    -- Acting user at generation time (not necessarily a volunteer)
                    generated_by UUID NOT NULL,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE UNIQUE INDEX idx_court_reports_casa_case_id ON court_reports(casa_case_id);

                CREATE TRIGGER update_court_reports_updated_at
                    BEFORE UPDATE ON court_reports
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_court_reports_updated_at ON court_reports;
                DROP TABLE IF EXISTS court_reports CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
