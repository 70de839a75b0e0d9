//! SeaORM entity definitions for PostgreSQL database.

pub mod api_key;
pub mod casa_case;
pub mod case_assignment;
pub mod court_report;
pub mod user;
