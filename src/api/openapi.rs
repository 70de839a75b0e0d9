//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CASA Court Reports Server",
        version = "0.1.0",
        description = "List assigned cases, generate court reports from Word templates and download them"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        api::health::health,
        api::health::ready,
        api::case_court_reports::index,
        api::case_court_reports::show,
        api::case_court_reports::generate,
    ),
    components(
        schemas(
            error::ErrorResponse,
            api::health::HealthResponse,
            api::health::ReadyResponse,
            models::AssignedCase,
            models::AssignedCasesResponse,
            models::CaseNumberParams,
            models::GenerateReportRequest,
            models::GenerateReportResponse,
            models::GenerateStatus,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Court Reports", description = "Case court report listing, download and generation")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add API key security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new(crate::config::API_KEY_HEADER),
                    ),
                ),
            );
        }
    }
}
