//! Court report workflow: list assigned cases, generate a report, read it back.

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::{AttachmentStore, CaseRepository, ReportRenderer};
use crate::error::{AppError, AppResult};
use crate::models::{
    AssignedCase, Attachment, CaseRecord, CurrentUser, DOCX_CONTENT_TYPE, NewAttachment,
    OpenedAttachment, ReportDraft,
};

/// Result of a generate request.
#[derive(Debug)]
pub enum GenerateOutcome {
    Generated {
        case: CaseRecord,
        attachment: Attachment,
    },
    CaseNotFound,
}

/// Court report service wired to its collaborators.
pub struct CourtReportService {
    cases: Arc<dyn CaseRepository>,
    renderer: Arc<dyn ReportRenderer>,
    attachments: Arc<dyn AttachmentStore>,
    template_dir: PathBuf,
    scratch_dir: PathBuf,
}

impl CourtReportService {
    pub fn new(
        cases: Arc<dyn CaseRepository>,
        renderer: Arc<dyn ReportRenderer>,
        attachments: Arc<dyn AttachmentStore>,
        template_dir: PathBuf,
    ) -> Self {
        Self {
            cases,
            renderer,
            attachments,
            template_dir,
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// Directory for the per-generation scratch file (defaults to the OS temp dir).
    pub fn with_scratch_dir(mut self, scratch_dir: PathBuf) -> Self {
        self.scratch_dir = scratch_dir;
        self
    }

    /// Cases actively assigned to the user.
    pub async fn assigned_cases(&self, user: &CurrentUser) -> AppResult<Vec<AssignedCase>> {
        self.cases.list_assigned_to(user.id).await
    }

    /// Resolve a case that has a report attached.
    ///
    /// Returns `None` when the case does not exist or has no report; no
    /// attachment bytes are read.
    pub async fn find_reportable_case(&self, case_number: &str) -> AppResult<Option<CaseRecord>> {
        let Some(case) = self.cases.find_by_case_number(case_number).await? else {
            return Ok(None);
        };

        if !self.attachments.is_attached(&case).await? {
            return Ok(None);
        }

        Ok(Some(case))
    }

    /// Read the case's report, refusing to return a short read.
    pub async fn read_report(&self, case: &CaseRecord) -> AppResult<OpenedAttachment> {
        let opened = self
            .attachments
            .open(case)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {}", case.case_number)))?;

        let actual = opened.bytes.len();
        if actual as i64 != opened.attachment.byte_size {
            return Err(AppError::TruncatedAttachment {
                expected: opened.attachment.byte_size,
                actual,
            });
        }

        Ok(opened)
    }

    /// Render the case's report and attach it, replacing any previous report.
    ///
    /// Render and storage failures propagate; the previous attachment is left
    /// in place when either fails.
    pub async fn generate(&self, user: &CurrentUser, case_number: &str) -> AppResult<GenerateOutcome> {
        let Some(case) = self.cases.find_by_case_number(case_number).await? else {
            info!(case_number = %case_number, "Court report requested for unknown case");
            return Ok(GenerateOutcome::CaseNotFound);
        };

        let draft = ReportDraft::new(case, user, &self.template_dir);
        let context = draft.context(Utc::now().date_naive());
        let variant = context.variant;

        let rendered = self.renderer.render(&draft.template_path, &context).await?;

        // Scratch file lives until the end of this scope, whichever way it exits.
        let mut scratch = tempfile::Builder::new()
            .prefix("court-report-")
            .suffix(".docx")
            .tempfile_in(&self.scratch_dir)
            .map_err(|e| AppError::Storage(format!("Failed to create scratch file: {}", e)))?;
        let bytes = stage(scratch.as_file_mut(), &rendered)?;

        let attachment = self
            .attachments
            .attach(
                &draft.case,
                NewAttachment {
                    filename: draft.case.report_filename(),
                    content_type: DOCX_CONTENT_TYPE.to_string(),
                    bytes,
                    generated_by: draft.generated_by,
                },
            )
            .await?;

        if let Err(e) = scratch.close() {
            warn!("Failed to remove court report scratch file: {}", e);
        }

        info!(
            case_number = %draft.case.case_number,
            variant = %variant,
            bytes = attachment.byte_size,
            generated_by = %draft.generated_by,
            "Court report generated"
        );

        Ok(GenerateOutcome::Generated {
            case: draft.case,
            attachment,
        })
    }
}

/// Write the rendered document to the scratch file and read it back.
fn stage<F: Read + Write + Seek>(scratch: &mut F, rendered: &[u8]) -> AppResult<Vec<u8>> {
    let io_err = |e: std::io::Error| AppError::Storage(format!("Scratch file I/O failed: {}", e));

    scratch.write_all(rendered).map_err(io_err)?;
    scratch.flush().map_err(io_err)?;
    scratch.seek(SeekFrom::Start(0)).map_err(io_err)?;

    let mut staged = Vec::with_capacity(rendered.len());
    scratch.read_to_end(&mut staged).map_err(io_err)?;

    if staged.len() != rendered.len() {
        return Err(AppError::Storage(format!(
            "Scratch file returned {} of {} bytes",
            staged.len(),
            rendered.len()
        )));
    }

    Ok(staged)
}
