//! Migration: Create casa_cases table.

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
                CREATE TABLE casa_cases (
                    id UUID PRIMARY KEY,
                    case_number VARCHAR(100) NOT NULL,
                    transition_aged_youth BOOLEAN NOT NULL DEFAULT FALSE,
                    court_date DATE,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE UNIQUE INDEX idx_casa_cases_case_number ON casa_cases(case_number);

                CREATE TRIGGER update_casa_cases_updated_at
                    BEFORE UPDATE ON casa_cases
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
                DROP TRIGGER IF EXISTS update_casa_cases_updated_at ON casa_cases;
                DROP TABLE IF EXISTS casa_cases CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
