//! Domain models for the court reports server.

pub mod api_key;
pub mod case;
pub mod court_report;
pub mod user;

// Re-export commonly used types
pub use api_key::{ApiKey, ApiKeyOwner};
pub use case::{AssignedCase, CaseRecord, TemplateVariant};
pub use court_report::{
    AssignedCasesResponse, Attachment, CaseNumberParams, DOCX_CONTENT_TYPE, DOCX_FORMAT,
    GenerateReportRequest, GenerateReportResponse, GenerateStatus, NewAttachment,
    OpenedAttachment, ReportContext, ReportDraft,
};
pub use user::{CurrentUser, UserRole};
