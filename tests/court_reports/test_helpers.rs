//! Shared test helpers: in-memory collaborators and the test app.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::dev::ServiceResponse;
use actix_web::{App, HttpResponse, test, web};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use court_reports_lib::api::configure_court_report_routes;
use court_reports_lib::auth::{AdminKey, CourtReportAction, CourtReportPolicy, RolePolicy};
use court_reports_lib::error::{AppError, AppResult};
use court_reports_lib::middleware::VerifyAuthorized;
use court_reports_lib::models::{
    ApiKeyOwner, AssignedCase, Attachment, CaseRecord, CurrentUser, NewAttachment,
    OpenedAttachment, ReportContext, UserRole,
};
use court_reports_lib::services::api_key;
use court_reports_lib::services::{
    AttachmentStore, CaseRepository, CourtReportService, ReportRenderer, UserDirectory,
};
use tempfile::TempDir;
use uuid::Uuid;

/// Admin key used in tests.
pub const TEST_ADMIN_KEY: &str = "test-admin-key-for-court-reports";

/// Route that deliberately skips the authorization check.
pub const UNCHECKED_PATH: &str = "/unchecked";

// ============================================================================
// Cases
// ============================================================================

struct Assignment {
    volunteer_id: Uuid,
    case_id: Uuid,
    active: bool,
}

#[derive(Default)]
pub struct InMemoryCases {
    cases: Mutex<Vec<CaseRecord>>,
    assignments: Mutex<Vec<Assignment>>,
}

impl InMemoryCases {
    pub fn add_case(&self, case_number: &str, transitioned: bool) -> CaseRecord {
        let case = CaseRecord {
            id: Uuid::new_v4(),
            case_number: case_number.to_string(),
            transition_aged_youth: transitioned,
            court_date: NaiveDate::from_ymd_opt(2026, 11, 2),
        };
        self.cases.lock().unwrap().push(case.clone());
        case
    }

    pub fn assign(&self, volunteer: &CurrentUser, case: &CaseRecord, active: bool) {
        self.assignments.lock().unwrap().push(Assignment {
            volunteer_id: volunteer.id,
            case_id: case.id,
            active,
        });
    }
}

#[async_trait]
impl CaseRepository for InMemoryCases {
    async fn find_by_case_number(&self, case_number: &str) -> AppResult<Option<CaseRecord>> {
        Ok(self
            .cases
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.case_number == case_number)
            .cloned())
    }

    async fn list_assigned_to(&self, user_id: Uuid) -> AppResult<Vec<AssignedCase>> {
        let assignments = self.assignments.lock().unwrap();
        Ok(self
            .cases
            .lock()
            .unwrap()
            .iter()
            .filter(|c| {
                assignments
                    .iter()
                    .any(|a| a.active && a.volunteer_id == user_id && a.case_id == c.id)
            })
            .map(|c| AssignedCase {
                id: c.id,
                case_number: c.case_number.clone(),
                transition_aged_youth: c.transition_aged_youth,
            })
            .collect())
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Renderer that records what it was asked and numbers its output.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Mutex<Vec<(PathBuf, ReportContext)>>,
    pub fail: AtomicBool,
}

impl RecordingRenderer {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_template(&self) -> Option<PathBuf> {
        self.calls.lock().unwrap().last().map(|(p, _)| p.clone())
    }
}

#[async_trait]
impl ReportRenderer for RecordingRenderer {
    async fn render(&self, template_path: &Path, context: &ReportContext) -> AppResult<Vec<u8>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Render(format!(
                "Failed to read template {}",
                template_path.display()
            )));
        }
        let mut calls = self.calls.lock().unwrap();
        calls.push((template_path.to_path_buf(), context.clone()));
        Ok(format!("report {} #{}", context.case_number, calls.len()).into_bytes())
    }
}

// ============================================================================
// Attachments
// ============================================================================

/// Attachment store held in memory, with switches for failure modes.
#[derive(Default)]
pub struct InMemoryAttachments {
    reports: Mutex<HashMap<Uuid, (Attachment, Vec<u8>)>>,
    pub opens: AtomicUsize,
    pub fail_attach: AtomicBool,
    pub truncate_reads: AtomicBool,
}

impl InMemoryAttachments {
    pub fn current(&self, case: &CaseRecord) -> Option<(Attachment, Vec<u8>)> {
        self.reports.lock().unwrap().get(&case.id).cloned()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

#[async_trait]
impl AttachmentStore for InMemoryAttachments {
    async fn attach(&self, case: &CaseRecord, new: NewAttachment) -> AppResult<Attachment> {
        if self.fail_attach.load(Ordering::SeqCst) {
            return Err(AppError::Storage("Failed to upload file to S3".to_string()));
        }
        let attachment = Attachment {
            case_id: case.id,
            storage_key: format!("court_reports/{}/{}", case.id, new.filename),
            filename: new.filename,
            content_type: new.content_type,
            byte_size: new.bytes.len() as i64,
            generated_by: new.generated_by,
            updated_at: Utc::now(),
        };
        self.reports
            .lock()
            .unwrap()
            .insert(case.id, (attachment.clone(), new.bytes));
        Ok(attachment)
    }

    async fn is_attached(&self, case: &CaseRecord) -> AppResult<bool> {
        Ok(self.reports.lock().unwrap().contains_key(&case.id))
    }

    async fn open(&self, case: &CaseRecord) -> AppResult<Option<OpenedAttachment>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let truncate = self.truncate_reads.load(Ordering::SeqCst);
        Ok(self
            .current(case)
            .map(|(attachment, mut bytes)| {
                if truncate {
                    bytes.truncate(bytes.len() / 2);
                }
                OpenedAttachment { attachment, bytes }
            }))
    }
}

// ============================================================================
// Users and policy
// ============================================================================

/// API keys issued to in-memory users.
#[derive(Default)]
pub struct StaticUsers {
    owners: Mutex<HashMap<String, ApiKeyOwner>>,
    /// Key ids whose use was recorded, in order.
    pub touched: Mutex<Vec<Uuid>>,
}

impl StaticUsers {
    /// Register a user and return a working API key for them.
    pub fn issue_key(&self, user: &CurrentUser) -> String {
        let (full_key, key) = api_key::generate_key(user.id, "test", None);
        self.owners.lock().unwrap().insert(
            key.key_hash.clone(),
            ApiKeyOwner {
                key,
                user: user.clone(),
            },
        );
        full_key
    }
}

#[async_trait]
impl UserDirectory for StaticUsers {
    async fn find_by_api_key_hash(&self, key_hash: &str) -> AppResult<Option<ApiKeyOwner>> {
        Ok(self.owners.lock().unwrap().get(key_hash).cloned())
    }

    async fn record_api_key_use(&self, key_id: Uuid) -> AppResult<()> {
        self.touched.lock().unwrap().push(key_id);
        Ok(())
    }
}

/// Role policy that counts its decisions.
#[derive(Default)]
pub struct CountingPolicy {
    pub decisions: Mutex<Vec<CourtReportAction>>,
}

impl CourtReportPolicy for CountingPolicy {
    fn permits(&self, user: &CurrentUser, action: CourtReportAction) -> bool {
        self.decisions.lock().unwrap().push(action);
        RolePolicy.permits(user, action)
    }
}

// ============================================================================
// World
// ============================================================================

pub fn user(name: &str, role: UserRole, active: bool) -> CurrentUser {
    CurrentUser {
        id: Uuid::new_v4(),
        display_name: name.to_string(),
        email: format!("{}@example.org", name.to_lowercase().replace(' ', ".")),
        role,
        active,
    }
}

/// Collaborators shared by one test, plus a private scratch directory.
pub struct TestWorld {
    pub cases: Arc<InMemoryCases>,
    pub renderer: Arc<RecordingRenderer>,
    pub attachments: Arc<InMemoryAttachments>,
    pub users: Arc<StaticUsers>,
    pub policy: Arc<CountingPolicy>,
    pub scratch: TempDir,
}

impl TestWorld {
    pub fn new() -> Self {
        Self {
            cases: Arc::new(InMemoryCases::default()),
            renderer: Arc::new(RecordingRenderer::default()),
            attachments: Arc::new(InMemoryAttachments::default()),
            users: Arc::new(StaticUsers::default()),
            policy: Arc::new(CountingPolicy::default()),
            scratch: tempfile::tempdir().expect("Failed to create scratch dir"),
        }
    }

    /// Register an active volunteer and return them with their key.
    pub fn volunteer(&self, name: &str) -> (CurrentUser, String) {
        let volunteer = user(name, UserRole::Volunteer, true);
        let key = self.users.issue_key(&volunteer);
        (volunteer, key)
    }

    pub fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.scratch.path())
            .expect("Failed to read scratch dir")
            .next()
            .is_none()
    }

    pub fn decisions(&self) -> Vec<CourtReportAction> {
        self.policy.decisions.lock().unwrap().clone()
    }
}

async fn unchecked_handler() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Create the court reports app wired to the world's collaborators.
pub async fn create_test_app(
    world: &TestWorld,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let service = CourtReportService::new(
        world.cases.clone(),
        world.renderer.clone(),
        world.attachments.clone(),
        PathBuf::from("app/documents/templates"),
    )
    .with_scratch_dir(world.scratch.path().to_path_buf());

    let users: Arc<dyn UserDirectory> = world.users.clone();
    let policy: Arc<dyn CourtReportPolicy> = world.policy.clone();

    test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .app_data(web::Data::from(users))
            .app_data(web::Data::from(policy))
            .app_data(web::Data::new(AdminKey::new(Some(TEST_ADMIN_KEY.to_string()))))
            .configure(configure_court_report_routes)
            .service(
                web::scope(UNCHECKED_PATH)
                    .wrap(VerifyAuthorized)
                    .route("", web::get().to(unchecked_handler)),
            ),
    )
    .await
}

/// POST a generate request with the given key.
pub async fn generate<S>(app: &S, key: &str, case_number: &str) -> (u16, serde_json::Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri("/case_court_reports")
        .insert_header(("X-API-Key", key))
        .set_json(serde_json::json!({
            "case_court_report": { "case_number": case_number }
        }))
        .to_request();

    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: serde_json::Value = test::read_body_json(resp).await;
    (status, body)
}

/// GET a path with the given key.
pub async fn get<S>(app: &S, key: &str, uri: &str) -> ServiceResponse
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header(("X-API-Key", key))
        .to_request();
    test::call_service(app, req).await
}
