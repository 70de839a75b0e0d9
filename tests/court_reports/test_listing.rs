//! Listing of the caller's assigned cases.

use actix_web::test;
use court_reports_lib::api::flash;
use court_reports_lib::models::UserRole;
use serde_json::Value;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_lists_only_actively_assigned_cases() {
    let world = TestWorld::new();
    let (val, key) = world.volunteer("Val Volunteer");
    let (other, _) = world.volunteer("Olly Other");

    let mine = world.cases.add_case("CASA-123", false);
    let ended = world.cases.add_case("CASA-456", true);
    let theirs = world.cases.add_case("CASA-789", false);
    world.cases.assign(&val, &mine, true);
    world.cases.assign(&val, &ended, false);
    world.cases.assign(&other, &theirs, true);

    let app = create_test_app(&world).await;
    let resp = get(&app, &key, "/case_court_reports").await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    let cases = body["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0]["case_number"], "CASA-123");
    assert_eq!(cases[0]["transition_aged_youth"], false);
    assert_eq!(cases[0]["id"], mine.id.to_string());
    assert!(body.get("alert").is_none());
}

#[actix_rt::test]
async fn test_empty_listing_is_ok() {
    let world = TestWorld::new();
    let supervisor = user("Sam Supervisor", UserRole::Supervisor, true);
    let key = world.users.issue_key(&supervisor);
    world.cases.add_case("CASA-123", false);

    let app = create_test_app(&world).await;
    let resp = get(&app, &key, "/case_court_reports").await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["cases"], serde_json::json!([]));
}

#[actix_rt::test]
async fn test_pending_alert_is_returned_once_and_cleared() {
    let world = TestWorld::new();
    let (_, key) = world.volunteer("Val Volunteer");
    let app = create_test_app(&world).await;

    let req = test::TestRequest::get()
        .uri("/case_court_reports")
        .insert_header(("X-API-Key", key.as_str()))
        .cookie(flash::alert_cookie("Report CASA-1 is not found."))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let removal = resp
        .response()
        .cookies()
        .find(|c| c.name() == flash::FLASH_ALERT_COOKIE)
        .expect("alert cookie should be cleared");
    assert_eq!(removal.value(), "");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["alert"], "Report CASA-1 is not found.");
}
