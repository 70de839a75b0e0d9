//! Report generation.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use actix_web::test;
use court_reports_lib::error::ErrorResponse;
use court_reports_lib::models::{DOCX_CONTENT_TYPE, TemplateVariant};

use super::test_helpers::*;

#[actix_rt::test]
async fn test_generate_non_transitioned_case() {
    let world = TestWorld::new();
    let (val, key) = world.volunteer("Val Volunteer");
    let case = world.cases.add_case("CASA-123", false);
    let app = create_test_app(&world).await;

    let (status, body) = generate(&app, &key, "CASA-123").await;

    assert_eq!(status, 200);
    assert_eq!(body["link"], "/case_court_reports/CASA-123.docx");
    assert_eq!(body["status"], "ok");
    assert!(body.get("error_messages").is_none());

    assert_eq!(
        world.renderer.last_template(),
        Some(PathBuf::from(
            "app/documents/templates/report_template_non_transition.docx"
        ))
    );
    let (_, context) = world.renderer.calls.lock().unwrap()[0].clone();
    assert_eq!(context.variant, TemplateVariant::NonTransition);
    assert_eq!(context.generated_by, "Val Volunteer");

    let (attachment, _) = world.attachments.current(&case).unwrap();
    assert_eq!(attachment.filename, "CASA-123.docx");
    assert_eq!(attachment.content_type, DOCX_CONTENT_TYPE);
    assert_eq!(attachment.generated_by, val.id);
    assert!(world.scratch_is_empty());
}

#[actix_rt::test]
async fn test_generate_transitioned_case_uses_transition_template() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    world.cases.add_case("CASA-TY", true);
    let app = create_test_app(&world).await;

    let (status, _) = generate(&app, &key, "CASA-TY").await;

    assert_eq!(status, 200);
    assert_eq!(
        world.renderer.last_template(),
        Some(PathBuf::from(
            "app/documents/templates/report_template_transition.docx"
        ))
    );
}

#[actix_rt::test]
async fn test_generate_unknown_case_changes_nothing() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    world.cases.add_case("CASA-123", false);
    let app = create_test_app(&world).await;

    let (status, body) = generate(&app, &key, "DOES-NOT-EXIST").await;

    assert_eq!(status, 404);
    assert_eq!(body["link"], "");
    assert_eq!(body["status"], "not_found");
    let messages = body["error_messages"].as_str().unwrap();
    assert!(messages.contains("Report DOES-NOT-EXIST is not found."));
    assert!(messages.contains("alert"));

    assert_eq!(world.renderer.call_count(), 0);
    assert_eq!(world.attachments.len(), 0);
}

#[actix_rt::test]
async fn test_generate_twice_keeps_only_the_second_report() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    let case = world.cases.add_case("CASA-123", false);
    let app = create_test_app(&world).await;

    let (first, _) = generate(&app, &key, "CASA-123").await;
    let (second, _) = generate(&app, &key, "CASA-123").await;
    assert_eq!((first, second), (200, 200));

    assert_eq!(world.attachments.len(), 1);
    let (_, bytes) = world.attachments.current(&case).unwrap();
    assert_eq!(bytes, b"report CASA-123 #2");
}

#[actix_rt::test]
async fn test_generate_rejects_unknown_body_fields() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    world.cases.add_case("CASA-123", false);
    let app = create_test_app(&world).await;

    let req = test::TestRequest::post()
        .uri("/case_court_reports")
        .insert_header(("X-API-Key", key.as_str()))
        .set_json(serde_json::json!({
            "case_court_report": { "case_number": "CASA-123", "casa_case_id": "1" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    assert_eq!(world.renderer.call_count(), 0);
}

#[actix_rt::test]
async fn test_render_failure_propagates_and_keeps_previous_report() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    let case = world.cases.add_case("CASA-123", false);
    let app = create_test_app(&world).await;
    generate(&app, &key, "CASA-123").await;
    let (_, before) = world.attachments.current(&case).unwrap();

    world.renderer.fail.store(true, Ordering::SeqCst);
    let req = test::TestRequest::post()
        .uri("/case_court_reports")
        .insert_header(("X-API-Key", key.as_str()))
        .set_json(serde_json::json!({ "case_court_report": { "case_number": "CASA-123" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 500);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "RENDER_ERROR");

    let (_, after) = world.attachments.current(&case).unwrap();
    assert_eq!(before, after);
}

#[actix_rt::test]
async fn test_storage_failure_propagates_and_cleans_scratch() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    let case = world.cases.add_case("CASA-123", false);
    world.attachments.fail_attach.store(true, Ordering::SeqCst);
    let app = create_test_app(&world).await;

    let req = test::TestRequest::post()
        .uri("/case_court_reports")
        .insert_header(("X-API-Key", key.as_str()))
        .set_json(serde_json::json!({ "case_court_report": { "case_number": "CASA-123" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 500);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "STORAGE_ERROR");
    assert!(world.attachments.current(&case).is_none());
    assert!(world.scratch_is_empty());
}
