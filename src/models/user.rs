//! User models and roles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles a CASA user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    CasaAdmin,
    Supervisor,
    #[default]
    Volunteer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CasaAdmin => "casa_admin",
            Self::Supervisor => "supervisor",
            Self::Volunteer => "volunteer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "casa_admin" | "admin" => Some(Self::CasaAdmin),
            "supervisor" => Some(Self::Supervisor),
            "volunteer" => Some(Self::Volunteer),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated user on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: UserRole,
    pub active: bool,
}

impl CurrentUser {
    /// Synthetic admin used for requests authenticated with the bootstrap admin key.
    pub fn bootstrap_admin() -> Self {
        Self {
            id: Uuid::nil(),
            display_name: "Admin (Bootstrap)".to_string(),
            email: "admin@localhost".to_string(),
            role: UserRole::CasaAdmin,
            active: true,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::CasaAdmin)
    }
}

impl From<crate::entity::user::Model> for CurrentUser {
    fn from(m: crate::entity::user::Model) -> Self {
        Self {
            id: m.id,
            display_name: m.display_name,
            email: m.email,
            role: UserRole::parse(&m.role).unwrap_or_default(),
            active: m.active,
        }
    }
}
