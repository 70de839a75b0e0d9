//! Business logic services and the collaborator seams they depend on.

pub mod api_key;
pub mod attachments;
pub mod cases;
pub mod court_reports;
pub mod markup;
pub mod renderer;
pub mod storage;

pub use api_key::UserDirectory;
pub use attachments::{AttachmentStore, S3AttachmentStore};
pub use cases::CaseRepository;
pub use court_reports::{CourtReportService, GenerateOutcome};
pub use renderer::{DocxTemplateRenderer, ReportRenderer};
pub use storage::{ObjectStore, Storage};
