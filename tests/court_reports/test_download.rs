//! Report downloads and the not-found redirect.

use std::sync::atomic::Ordering;

use actix_web::http::header;
use actix_web::test;
use court_reports_lib::api::flash;
use court_reports_lib::error::ErrorResponse;
use court_reports_lib::models::DOCX_CONTENT_TYPE;
use serde_json::Value;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_case_without_report_redirects_without_reading() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    world.cases.add_case("CASA-123", false);
    let app = create_test_app(&world).await;

    for uri in [
        "/case_court_reports/CASA-123.docx",
        "/case_court_reports/DOES-NOT-EXIST.docx",
    ] {
        let resp = get(&app, &key, uri).await;
        assert_eq!(resp.status().as_u16(), 302, "{uri}");
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/case_court_reports"
        );
    }

    assert_eq!(world.attachments.opens.load(Ordering::SeqCst), 0);
}

#[actix_rt::test]
async fn test_redirect_alert_shows_on_listing() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    let app = create_test_app(&world).await;

    let resp = get(&app, &key, "/case_court_reports/CASA-404.docx").await;
    let alert = resp
        .response()
        .cookies()
        .find(|c| c.name() == flash::FLASH_ALERT_COOKIE)
        .expect("redirect should carry an alert")
        .into_owned();

    let req = test::TestRequest::get()
        .uri("/case_court_reports")
        .insert_header(("X-API-Key", key.as_str()))
        .cookie(alert)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["alert"], "Report CASA-404 is not found.");
}

#[actix_rt::test]
async fn test_download_returns_exactly_the_stored_bytes() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    let case = world.cases.add_case("CASA-123", false);
    let app = create_test_app(&world).await;

    let (status, _) = generate(&app, &key, "CASA-123").await;
    assert_eq!(status, 200);
    let (attachment, stored) = world.attachments.current(&case).unwrap();

    let resp = get(&app, &key, "/case_court_reports/CASA-123.docx").await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        DOCX_CONTENT_TYPE
    );
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("CASA-123.docx"));

    let body = test::read_body(resp).await;
    assert_eq!(body.len() as i64, attachment.byte_size);
    assert_eq!(body.as_ref(), stored.as_slice());
}

#[actix_rt::test]
async fn test_case_number_ending_in_docx_downloads_via_its_link() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    world.cases.add_case("OLD-7.docx", false);
    world.cases.add_case("OLD-7", false);
    let app = create_test_app(&world).await;

    let (status, body) = generate(&app, &key, "OLD-7.docx").await;
    assert_eq!(status, 200);
    let link = body["link"].as_str().unwrap().to_string();
    assert_eq!(link, "/case_court_reports/OLD-7.docx.docx");

    let resp = get(&app, &key, &link).await;
    assert_eq!(resp.status().as_u16(), 200);
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("OLD-7.docx.docx"));

    // The bare segment names OLD-7, which has no report yet.
    let resp = get(&app, &key, "/case_court_reports/OLD-7.DOCX").await;
    assert_eq!(resp.status().as_u16(), 302);
}

#[actix_rt::test]
async fn test_format_negotiation() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    world.cases.add_case("CASA-123", false);
    let app = create_test_app(&world).await;
    generate(&app, &key, "CASA-123").await;

    for uri in [
        "/case_court_reports/CASA-123",
        "/case_court_reports/CASA-123?format=docx",
    ] {
        let resp = get(&app, &key, uri).await;
        assert_eq!(resp.status().as_u16(), 200, "{uri}");
    }

    let resp = get(&app, &key, "/case_court_reports/CASA-123?format=pdf").await;
    assert_eq!(resp.status().as_u16(), 406);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "NOT_ACCEPTABLE");
}

#[actix_rt::test]
async fn test_truncated_read_is_an_error_not_a_short_file() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    world.cases.add_case("CASA-123", false);
    let app = create_test_app(&world).await;
    generate(&app, &key, "CASA-123").await;

    world.attachments.truncate_reads.store(true, Ordering::SeqCst);
    let resp = get(&app, &key, "/case_court_reports/CASA-123.docx").await;

    assert_eq!(resp.status().as_u16(), 500);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "ATTACHMENT_TRUNCATED");
}
