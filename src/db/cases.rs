//! Database queries for cases.

use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use uuid::Uuid;

use crate::entity::casa_case::{self, Entity as CasaCase};
use crate::entity::case_assignment;
use crate::error::{AppError, AppResult};
use crate::models::AssignedCase;

use super::DbPool;

/// Narrow projection used for listing.
#[derive(Debug, FromQueryResult)]
struct AssignedCaseRow {
    id: Uuid,
    case_number: String,
    transition_aged_youth: bool,
}

impl DbPool {
    /// Get a case by its case number.
    pub async fn find_case_by_number(&self, case_number: &str) -> AppResult<Option<casa_case::Model>> {
        let result = CasaCase::find()
            .filter(casa_case::Column::CaseNumber.eq(case_number))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get case: {}", e)))?;

        Ok(result)
    }

    /// List cases with an active assignment to the given volunteer.
    pub async fn list_cases_actively_assigned_to(
        &self,
        volunteer_id: Uuid,
    ) -> AppResult<Vec<AssignedCase>> {
        let rows = CasaCase::find()
            .select_only()
            .column(casa_case::Column::Id)
            .column(casa_case::Column::CaseNumber)
            .column(casa_case::Column::TransitionAgedYouth)
            .join(JoinType::InnerJoin, casa_case::Relation::Assignments.def())
            .filter(case_assignment::Column::VolunteerId.eq(volunteer_id))
            .filter(case_assignment::Column::Active.eq(true))
            .order_by_asc(casa_case::Column::CaseNumber)
            .into_model::<AssignedCaseRow>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list assigned cases: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| AssignedCase {
                id: row.id,
                case_number: row.case_number,
                transition_aged_youth: row.transition_aged_youth,
            })
            .collect())
    }
}
