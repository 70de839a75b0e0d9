//! Database queries for court report attachment metadata.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::court_report::{self, ActiveModel, Entity as CourtReport};
use crate::error::{AppError, AppResult};

use super::DbPool;

/// Fields written when a report is attached to a case.
#[derive(Debug, Clone)]
pub struct CourtReportRow {
    pub casa_case_id: Uuid,
    pub filename: String,
    pub storage_key: String,
    pub content_type: String,
    pub byte_size: i64,
    pub generated_by: Uuid,
}

impl DbPool {
    /// Get the current report attachment of a case.
    pub async fn find_court_report(&self, casa_case_id: Uuid) -> AppResult<Option<court_report::Model>> {
        let result = CourtReport::find()
            .filter(court_report::Column::CasaCaseId.eq(casa_case_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get court report: {}", e)))?;

        Ok(result)
    }

    /// Insert or replace the report attachment of a case.
    pub async fn upsert_court_report(&self, row: CourtReportRow) -> AppResult<court_report::Model> {
        let now = Utc::now();
        let casa_case_id = row.casa_case_id;

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            casa_case_id: Set(row.casa_case_id),
            filename: Set(row.filename),
            storage_key: Set(row.storage_key),
            content_type: Set(row.content_type),
            byte_size: Set(row.byte_size),
            generated_by: Set(row.generated_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        CourtReport::insert(model)
            .on_conflict(
                OnConflict::column(court_report::Column::CasaCaseId)
                    .update_columns([
                        court_report::Column::Filename,
                        court_report::Column::StorageKey,
                        court_report::Column::ContentType,
                        court_report::Column::ByteSize,
                        court_report::Column::GeneratedBy,
                        court_report::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to save court report: {}", e)))?;

        self.find_court_report(casa_case_id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to fetch saved court report".to_string()))
    }
}
