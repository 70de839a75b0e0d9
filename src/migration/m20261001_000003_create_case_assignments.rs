//! Migration: Create case_assignments table.
//!
//! A volunteer is "actively assigned" to a case while an active row exists.

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
                CREATE TABLE case_assignments (
                    id UUID PRIMARY KEY,
                    casa_case_id UUID NOT NULL REFERENCES casa_cases(id) ON DELETE CASCADE,
                    volunteer_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    active BOOLEAN NOT NULL DEFAULT TRUE,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE UNIQUE INDEX idx_case_assignments_case_volunteer
                    ON case_assignments(casa_case_id, volunteer_id);

                -- Listing assigned cases filters on volunteer + active
                CREATE INDEX idx_case_assignments_volunteer_active
                    ON case_assignments(volunteer_id)
                    WHERE active;

                CREATE TRIGGER update_case_assignments_updated_at
                    BEFORE UPDATE ON case_assignments
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
                DROP TRIGGER IF EXISTS update_case_assignments_updated_at ON case_assignments;
                DROP TABLE IF EXISTS case_assignments CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
