//! CASA court reports server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};
use actix_web::{App, HttpServer, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use court_reports_lib::api::{self, ApiDoc};
use court_reports_lib::auth::{AdminKey, CourtReportPolicy, RolePolicy};
use court_reports_lib::config::{ADMIN_KEY_HEADER, API_KEY_HEADER, Config};
use court_reports_lib::db::DbPool;
use court_reports_lib::middleware;
use court_reports_lib::services::{
    CaseRepository, CourtReportService, DocxTemplateRenderer, S3AttachmentStore, Storage,
    UserDirectory,
};

/// Fail startup with a logged message.
fn fatal(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::other(format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| fatal("Failed to set tracing subscriber", e))?;

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL, CR_ADMIN_KEY and S3_* must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  CASA Court Reports Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    if !config.template_dir.is_dir() {
        warn!(
            "Template directory {} does not exist; generation will fail",
            config.template_dir.display()
        );
    }

    let pool = DbPool::new(&config)
        .await
        .map_err(|e| fatal("Failed to connect to database", e))?;
    info!("Database connection established");

    pool.run_migrations()
        .await
        .map_err(|e| fatal("Failed to run migrations", e))?;

    let storage = Storage::new(&config.storage)
        .await
        .map_err(|e| fatal("Failed to initialize storage", e))?;

    let cases: Arc<dyn CaseRepository> = Arc::new(pool.clone());
    let users: Arc<dyn UserDirectory> = Arc::new(pool.clone());
    let policy: Arc<dyn CourtReportPolicy> = Arc::new(RolePolicy);
    let service = web::Data::new(CourtReportService::new(
        cases,
        Arc::new(DocxTemplateRenderer),
        Arc::new(S3AttachmentStore::new(pool.clone(), Arc::new(storage))),
        config.template_dir.clone(),
    ));
    let users = web::Data::from(users);
    let policy = web::Data::from(policy);

    let bind_address = config.bind_address();
    let admin_key = AdminKey::new(config.admin_key.clone());
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!("Starting server at http://{} ({} workers)", bind_address, cpus);
        cpus
    };

    let server = HttpServer::new(move || {
        let key_headers = [
            header::ACCEPT,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-api-key"),
            HeaderName::from_static("x-admin-key"),
        ];
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(key_headers)
                .supports_credentials()
                .max_age(3600)
        } else {
            // Same-origin only.
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(key_headers)
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .wrap(middleware::RequestLogger)
            .app_data(web::Data::new(pool.clone()))
            .app_data(service.clone())
            .app_data(users.clone())
            .app_data(policy.clone())
            .app_data(web::Data::new(admin_key.clone()))
            .service(web::scope("/api/v1").configure(api::configure_health_routes))
            .configure(api::configure_court_report_routes)
            .service(
                SwaggerUi::new("/api/docs/{_:.*}").url("/api/openapi.json", ApiDoc::openapi()),
            )
    });

    info!(
        "Authentication headers: {} (users), {} (bootstrap)",
        API_KEY_HEADER, ADMIN_KEY_HEADER
    );

    server.workers(worker_count).bind(&bind_address)?.run().await
}
