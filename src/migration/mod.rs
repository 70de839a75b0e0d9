//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_users;
mod m20261001_000002_create_casa_cases;
mod m20261001_000003_create_case_assignments;
mod m20261001_000004_create_api_keys;
mod m20261001_000005_create_court_reports;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_users::Migration),
            Box::new(m20261001_000002_create_casa_cases::Migration),
            Box::new(m20261001_000003_create_case_assignments::Migration),
            Box::new(m20261001_000004_create_api_keys::Migration),
            Box::new(m20261001_000005_create_court_reports::Migration),
        ]
    }
}
