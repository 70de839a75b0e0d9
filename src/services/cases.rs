//! Case lookup.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{AssignedCase, CaseRecord};

/// Query side of the case store.
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Resolve a case number to a case, or `None` when it does not exist.
    async fn find_by_case_number(&self, case_number: &str) -> AppResult<Option<CaseRecord>>;

    /// Cases actively assigned to the user, projected for listing.
    async fn list_assigned_to(&self, user_id: Uuid) -> AppResult<Vec<AssignedCase>>;
}

#[async_trait]
impl CaseRepository for DbPool {
    async fn find_by_case_number(&self, case_number: &str) -> AppResult<Option<CaseRecord>> {
        Ok(self
            .find_case_by_number(case_number)
            .await?
            .map(CaseRecord::from))
    }

    async fn list_assigned_to(&self, user_id: Uuid) -> AppResult<Vec<AssignedCase>> {
        self.list_cases_actively_assigned_to(user_id).await
    }
}
