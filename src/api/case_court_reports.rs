//! Court report endpoints: list assigned cases, download and generate reports.
//!
//! Every handler must call [`Authorizer::authorize`]; the scope is wrapped in
//! [`VerifyAuthorized`] which turns a missing check into a 500.

use actix_web::http::header::{
    self, ContentDisposition, DispositionParam, DispositionType, Header,
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::info;

use super::flash;
use crate::auth::{ApiKeyAuth, Authorizer, CourtReportAction};
use crate::error::{AppError, AppResult};
use crate::middleware::VerifyAuthorized;
use crate::models::{
    AssignedCasesResponse, DOCX_CONTENT_TYPE, DOCX_FORMAT, GenerateReportRequest,
    GenerateReportResponse, GenerateStatus,
};
use crate::services::{CourtReportService, GenerateOutcome};

/// Base path of the court report routes.
pub const COURT_REPORTS_PATH: &str = "/case_court_reports";

/// Query parameters accepted by the download endpoint.
#[derive(Debug, Default, Deserialize)]
struct DownloadQuery {
    format: Option<String>,
}

fn not_found_message(case_number: &str) -> String {
    format!("Report {} is not found.", case_number)
}

/// Download link of a case's report.
pub fn download_link(case_number: &str) -> String {
    format!(
        "{}/{}.{}",
        COURT_REPORTS_PATH,
        urlencoding::encode(case_number),
        DOCX_FORMAT
    )
}

/// Split an optional `.docx` suffix (any case) off the path segment.
///
/// One trailing `.docx` is always read as the format, so a case number that
/// itself ends in `.docx` is addressed as `{case_number}.docx`, which is what
/// [`download_link`] produces.
fn split_format_suffix(id: &str) -> (&str, bool) {
    let suffix = format!(".{}", DOCX_FORMAT);
    let split = id.len().saturating_sub(suffix.len());
    match id.get(split..) {
        Some(ext) if ext.eq_ignore_ascii_case(&suffix) => (&id[..split], true),
        _ => (id, false),
    }
}

/// Check the requested representation is one we can produce.
///
/// `?format=` must be `docx` when given. Without a suffix or `?format=`, an
/// `Accept` header must allow the docx MIME type.
fn negotiate_docx(req: &HttpRequest, has_suffix: bool) -> AppResult<()> {
    let query = web::Query::<DownloadQuery>::from_query(req.query_string())
        .map(|q| q.into_inner())
        .unwrap_or_default();

    if let Some(format) = query.format {
        if format.eq_ignore_ascii_case(DOCX_FORMAT) {
            return Ok(());
        }
        return Err(AppError::NotAcceptable(format!(
            "Court reports are only available as {}, not {}",
            DOCX_FORMAT, format
        )));
    }

    if has_suffix {
        return Ok(());
    }

    let accepted = match header::Accept::parse(req) {
        Ok(accept) => accept,
        Err(_) => return Ok(()),
    };
    if accepted.is_empty()
        || accepted.iter().any(|q| {
            matches!(
                q.item.essence_str(),
                "*/*" | "application/*" | DOCX_CONTENT_TYPE
            )
        })
    {
        return Ok(());
    }

    Err(AppError::NotAcceptable(format!(
        "Court reports are only available as {}",
        DOCX_CONTENT_TYPE
    )))
}

/// List the cases actively assigned to the caller.
#[utoipa::path(
    get,
    path = "/case_court_reports",
    tag = "Court Reports",
    responses(
        (status = 200, description = "Cases assigned to the caller", body = AssignedCasesResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn index(
    req: HttpRequest,
    auth: ApiKeyAuth,
    authorizer: Authorizer,
    service: web::Data<CourtReportService>,
) -> AppResult<HttpResponse> {
    authorizer.authorize(&auth, CourtReportAction::Index).await?;

    let cases = service.assigned_cases(&auth.user).await?;
    let alert = flash::take_alert(&req);

    let mut response = HttpResponse::Ok();
    if alert.is_some() {
        response.cookie(flash::clear_cookie());
    }

    Ok(response.json(AssignedCasesResponse { cases, alert }))
}

/// Download a case's court report.
///
/// A missing case or report redirects to the listing with a flash alert.
#[utoipa::path(
    get,
    path = "/case_court_reports/{case_number}",
    tag = "Court Reports",
    params(
        ("case_number" = String, Path, description = "Case number, optionally with a .docx suffix"),
        ("format" = Option<String>, Query, description = "Requested format; only docx is supported")
    ),
    responses(
        (status = 200, description = "Report document (application/vnd.openxmlformats-officedocument.wordprocessingml.document)"),
        (status = 302, description = "Report not found; redirects to the listing with an alert"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
        (status = 406, description = "Unsupported format", body = crate::error::ErrorResponse),
        (status = 500, description = "Stored report could not be read in full", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn show(
    req: HttpRequest,
    auth: ApiKeyAuth,
    authorizer: Authorizer,
    service: web::Data<CourtReportService>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    authorizer.authorize(&auth, CourtReportAction::Show).await?;

    let id = path.into_inner();
    let (case_number, has_suffix) = split_format_suffix(&id);

    let Some(case) = service.find_reportable_case(case_number).await? else {
        info!(case_number = %case_number, "Court report not found, redirecting");
        return Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, COURT_REPORTS_PATH))
            .cookie(flash::alert_cookie(&not_found_message(case_number)))
            .finish());
    };

    negotiate_docx(&req, has_suffix)?;

    let opened = service.read_report(&case).await?;

    Ok(HttpResponse::Ok()
        .content_type(DOCX_CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(opened.attachment.filename)],
        })
        .body(opened.bytes))
}

/// Generate a case's court report, replacing any previous one.
#[utoipa::path(
    post,
    path = "/case_court_reports",
    tag = "Court Reports",
    request_body = GenerateReportRequest,
    responses(
        (status = 200, description = "Report generated", body = GenerateReportResponse),
        (status = 400, description = "Malformed request body", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
        (status = 404, description = "Case not found", body = GenerateReportResponse),
        (status = 500, description = "Rendering or storage failed", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn generate(
    auth: ApiKeyAuth,
    authorizer: Authorizer,
    service: web::Data<CourtReportService>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    authorizer.authorize(&auth, CourtReportAction::Generate).await?;

    let request: GenerateReportRequest = serde_json::from_slice(&body)?;
    let case_number = request.case_court_report.case_number;

    match service.generate(&auth.user, &case_number).await? {
        GenerateOutcome::Generated { case, .. } => Ok(HttpResponse::Ok().json(
            GenerateReportResponse {
                link: download_link(&case.case_number),
                status: GenerateStatus::Ok,
                error_messages: None,
            },
        )),
        GenerateOutcome::CaseNotFound => Ok(HttpResponse::NotFound().json(
            GenerateReportResponse {
                link: String::new(),
                status: GenerateStatus::NotFound,
                error_messages: Some(flash::render_alert(&not_found_message(&case_number))),
            },
        )),
    }
}

/// Configure court report routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(COURT_REPORTS_PATH)
            .wrap(VerifyAuthorized)
            .service(
                web::resource("")
                    .route(web::get().to(index))
                    .route(web::post().to(generate)),
            )
            .service(web::resource("/{case_number}").route(web::get().to(show))),
    );
}
