//! Report attachments: one current document per case.
//!
//! Bytes live in S3; the `court_reports` table records which object is current
//! and how large it was when attached. Each generation is uploaded under its
//! own key, and the row is switched only after the upload succeeded.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use super::storage::{ObjectStore, court_report_key};
use crate::db::DbPool;
use crate::db::court_reports::CourtReportRow;
use crate::error::{AppError, AppResult};
use crate::models::{Attachment, CaseRecord, NewAttachment, OpenedAttachment};

/// Attachment storage for case court reports.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Attach a document to the case, replacing the current one.
    async fn attach(&self, case: &CaseRecord, attachment: NewAttachment) -> AppResult<Attachment>;

    /// Whether the case currently has a report attached.
    async fn is_attached(&self, case: &CaseRecord) -> AppResult<bool>;

    /// Read the current attachment fully into memory.
    async fn open(&self, case: &CaseRecord) -> AppResult<Option<OpenedAttachment>>;
}

/// S3-backed attachment store with metadata in PostgreSQL.
#[derive(Clone)]
pub struct S3AttachmentStore {
    pool: DbPool,
    objects: Arc<dyn ObjectStore>,
}

impl S3AttachmentStore {
    pub fn new(pool: DbPool, objects: Arc<dyn ObjectStore>) -> Self {
        Self { pool, objects }
    }

    /// Best-effort removal of an object no row points at any more.
    async fn discard(&self, case: &CaseRecord, key: &str) {
        match self.objects.delete(key).await {
            Ok(()) => info!(key = %key, "Deleted unreferenced court report object"),
            Err(e) => warn!(
                case_number = %case.case_number,
                key = %key,
                "Failed to delete unreferenced court report object: {}", e
            ),
        }
    }
}

#[async_trait]
impl AttachmentStore for S3AttachmentStore {
    async fn attach(&self, case: &CaseRecord, attachment: NewAttachment) -> AppResult<Attachment> {
        let previous = self.pool.find_court_report(case.id).await?;
        let storage_key = court_report_key(case.id, Uuid::now_v7(), &attachment.filename);
        let byte_size = attachment.bytes.len() as i64;

        self.objects
            .put(&storage_key, attachment.bytes, &attachment.content_type)
            .await?;

        let row = CourtReportRow {
            casa_case_id: case.id,
            filename: attachment.filename,
            storage_key: storage_key.clone(),
            content_type: attachment.content_type,
            byte_size,
            generated_by: attachment.generated_by,
        };
        let saved = match self.pool.upsert_court_report(row).await {
            Ok(saved) => saved,
            Err(e) => {
                // The row still points at the previous object.
                self.discard(case, &storage_key).await;
                return Err(e);
            }
        };

        if let Some(previous) = previous {
            self.discard(case, &previous.storage_key).await;
        }

        Ok(saved.into())
    }

    async fn is_attached(&self, case: &CaseRecord) -> AppResult<bool> {
        Ok(self.pool.find_court_report(case.id).await?.is_some())
    }

    async fn open(&self, case: &CaseRecord) -> AppResult<Option<OpenedAttachment>> {
        let Some(model) = self.pool.find_court_report(case.id).await? else {
            return Ok(None);
        };

        let bytes = self.objects.get(&model.storage_key).await?.ok_or_else(|| {
            AppError::Storage(format!(
                "Court report object {} is missing from storage",
                model.storage_key
            ))
        })?;

        Ok(Some(OpenedAttachment {
            attachment: model.into(),
            bytes,
        }))
    }
}
