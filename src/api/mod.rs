//! API endpoint modules.

pub mod case_court_reports;
pub mod flash;
pub mod health;
pub mod openapi;

pub use case_court_reports::configure_routes as configure_court_report_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
