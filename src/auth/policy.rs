//! Court report authorization policy.

use crate::models::CurrentUser;

/// Actions on court reports that require a policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourtReportAction {
    Index,
    Show,
    Generate,
}

impl CourtReportAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Show => "show",
            Self::Generate => "generate",
        }
    }
}

impl std::fmt::Display for CourtReportAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decides whether a user may perform a court report action.
pub trait CourtReportPolicy: Send + Sync {
    fn permits(&self, user: &CurrentUser, action: CourtReportAction) -> bool;
}

/// Request extension recording that the policy was consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationVerified(pub CourtReportAction);

/// Default policy: every active user may list, download and generate.
///
/// Case scoping is not applied to downloads or generation; a supervisor or
/// admin routinely generates reports for cases they are not assigned to.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePolicy;

impl CourtReportPolicy for RolePolicy {
    fn permits(&self, user: &CurrentUser, _action: CourtReportAction) -> bool {
        user.active
    }
}
