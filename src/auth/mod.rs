//! Authentication and authorization for the court report endpoints.
//!
//! Authentication resolves the caller from an API key (or the bootstrap admin
//! key). Authorization asks a [`CourtReportPolicy`] whether the caller may
//! perform a [`CourtReportAction`], and marks the request as checked so the
//! `VerifyAuthorized` middleware can reject handlers that forgot to ask.

mod extractor;
mod policy;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

pub use extractor::{ApiKeyAuth, AuthError, Authorizer};
pub use policy::{AuthorizationVerified, CourtReportAction, CourtReportPolicy, RolePolicy};

/// Bootstrap admin key, kept out of logs and zeroized on drop.
#[derive(Clone)]
pub struct AdminKey(Option<SecretString>);

impl AdminKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.map(SecretString::from))
    }

    /// Compare in constant time. A missing admin key never matches.
    pub fn verify(&self, provided: &str) -> bool {
        match &self.0 {
            Some(secret) => secret
                .expose_secret()
                .as_bytes()
                .ct_eq(provided.as_bytes())
                .into(),
            None => false,
        }
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "AdminKey([REDACTED])"),
            None => write!(f, "AdminKey(None)"),
        }
    }
}
