//! Court report request/response and attachment models.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AssignedCase, CaseRecord, CurrentUser, TemplateVariant};

/// MIME type of Word documents.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Format name used in download links and `?format=`.
pub const DOCX_FORMAT: &str = "docx";

/// Generate request body. Only the case number is accepted.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct GenerateReportRequest {
    pub case_court_report: CaseNumberParams,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CaseNumberParams {
    pub case_number: String,
}

/// Outcome marker of a generate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenerateStatus {
    Ok,
    NotFound,
}

/// Generate response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateReportResponse {
    /// Download link for the generated report, empty when not found.
    pub link: String,
    pub status: GenerateStatus,
    /// Rendered flash message fragment (HTML), present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_messages: Option<String>,
}

/// Listing response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignedCasesResponse {
    pub cases: Vec<AssignedCase>,
    /// Pending flash alert, e.g. from a failed download redirect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
}

/// Metadata of the report currently attached to a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub case_id: Uuid,
    pub filename: String,
    pub storage_key: String,
    pub content_type: String,
    /// Size recorded at attach time; downloads must match it.
    pub byte_size: i64,
    pub generated_by: Uuid,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::court_report::Model> for Attachment {
    fn from(m: crate::entity::court_report::Model) -> Self {
        Self {
            case_id: m.casa_case_id,
            filename: m.filename,
            storage_key: m.storage_key,
            content_type: m.content_type,
            byte_size: m.byte_size,
            generated_by: m.generated_by,
            updated_at: m.updated_at,
        }
    }
}

/// Payload to attach to a case, replacing any existing attachment.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub generated_by: Uuid,
}

/// Attachment metadata together with the bytes read from storage.
#[derive(Debug, Clone)]
pub struct OpenedAttachment {
    pub attachment: Attachment,
    pub bytes: Vec<u8>,
}

/// Values substituted into a report template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub case_number: String,
    pub court_date: Option<NaiveDate>,
    pub generated_by: String,
    pub report_date: NaiveDate,
    pub variant: TemplateVariant,
}

impl ReportContext {
    /// Placeholder name/value pairs, without the `{{ }}` delimiters.
    pub fn placeholders(&self) -> Vec<(&'static str, String)> {
        vec![
            ("case_number", self.case_number.clone()),
            (
                "court_date",
                self.court_date
                    .map(|d| d.format("%B %-d, %Y").to_string())
                    .unwrap_or_default(),
            ),
            ("generated_by", self.generated_by.clone()),
            ("report_date", self.report_date.format("%B %-d, %Y").to_string()),
            ("report_type", self.variant.as_str().to_string()),
        ]
    }
}

/// Transient record of one report generation.
///
/// `generated_by` is whoever triggered the generation; it is not necessarily
/// a volunteer on the case.
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub case: CaseRecord,
    pub generated_by: Uuid,
    pub generated_by_name: String,
    pub template_path: PathBuf,
}

impl ReportDraft {
    pub fn new(case: CaseRecord, user: &CurrentUser, template_dir: &std::path::Path) -> Self {
        let template_path = case.template_variant().template_path(template_dir);
        Self {
            case,
            generated_by: user.id,
            generated_by_name: user.display_name.clone(),
            template_path,
        }
    }

    pub fn context(&self, report_date: NaiveDate) -> ReportContext {
        ReportContext {
            case_number: self.case.case_number.clone(),
            court_date: self.case.court_date,
            generated_by: self.generated_by_name.clone(),
            report_date,
            variant: self.case.template_variant(),
        }
    }
}
