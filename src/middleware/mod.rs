//! HTTP middleware.

mod request_logger;
mod verify_authorized;

pub use request_logger::RequestLogger;
pub use verify_authorized::VerifyAuthorized;
