#![allow(clippy::unwrap_used)]
// Integration tests for `WebDriverClient` / `Session` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use courtbot_driver::{Capabilities, Error, Locator, Session, WebDriverClient};

// ── Helpers ─────────────────────────────────────────────────────────

const SESSION: &str = "s1";
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

async fn setup() -> (MockServer, WebDriverClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = WebDriverClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

async fn open_session(server: &MockServer, client: &WebDriverClient) -> Session {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "sessionId": SESSION, "capabilities": { "browserName": "chrome" } }
        })))
        .mount(server)
        .await;

    client.new_session(&Capabilities::default()).await.unwrap()
}

fn session_path(suffix: &str) -> String {
    format!("/session/{SESSION}/{suffix}")
}

fn ok_null() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "value": null }))
}

// ── Session lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn test_new_session_sends_capabilities() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .and(body_json(Capabilities::default().to_request()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "sessionId": "abc", "capabilities": {} }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client.new_session(&Capabilities::default()).await.unwrap();
    assert_eq!(session.id(), "abc");
}

#[tokio::test]
async fn test_new_session_failure_surfaces_driver_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "value": {
                "error": "session not created",
                "message": "Chrome failed to start",
                "stacktrace": ""
            }
        })))
        .mount(&server)
        .await;

    let result = client.new_session(&Capabilities::default()).await;
    match result {
        Err(Error::WebDriver { error, message, status }) => {
            assert_eq!(error, "session not created");
            assert_eq!(message, "Chrome failed to start");
            assert_eq!(status, 500);
        }
        other => panic!("expected WebDriver error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_session() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("DELETE"))
        .and(path(format!("/session/{SESSION}")))
        .respond_with(ok_null())
        .expect(1)
        .mount(&server)
        .await;

    session.delete().await.unwrap();
}

// ── Navigation ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_navigate_posts_url() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("POST"))
        .and(path(session_path("url")))
        .and(body_json(json!({ "url": "https://club.example/Pages/login.aspx" })))
        .respond_with(ok_null())
        .expect(1)
        .mount(&server)
        .await;

    let target = Url::parse("https://club.example/Pages/login.aspx").unwrap();
    session.navigate(&target).await.unwrap();
}

#[tokio::test]
async fn test_ready_state_runs_script() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("POST"))
        .and(path(session_path("execute/sync")))
        .and(body_json(json!({ "script": "return document.readyState;", "args": [] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "complete" })))
        .mount(&server)
        .await;

    assert_eq!(session.ready_state().await.unwrap(), "complete");
}

// ── Elements ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_find_and_fill_element() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("POST"))
        .and(path(session_path("element")))
        .and(body_json(json!({ "using": "css selector", "value": "#txtUser" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "value": { ELEMENT_KEY: "e1" } })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(session_path("element/e1/clear")))
        .respond_with(ok_null())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(session_path("element/e1/value")))
        .and(body_json(json!({ "text": "alice" })))
        .respond_with(ok_null())
        .expect(1)
        .mount(&server)
        .await;

    let field = session.find_element(&Locator::css("#txtUser")).await.unwrap();
    assert_eq!(field.id(), "e1");
    session.clear(&field).await.unwrap();
    session.send_keys(&field, "alice").await.unwrap();
}

#[tokio::test]
async fn test_missing_element_maps_to_no_such_element() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("POST"))
        .and(path(session_path("element")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "value": { "error": "no such element", "message": "Unable to locate element" }
        })))
        .mount(&server)
        .await;

    let result = session.find_element(&Locator::text("Reservations")).await;
    match result {
        Err(Error::NoSuchElement { locator }) => assert_eq!(locator, "text=Reservations"),
        other => panic!("expected NoSuchElement, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_find_elements_empty_is_ok() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("POST"))
        .and(path(session_path("elements")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(&server)
        .await;

    let found = session
        .find_elements(&Locator::text("Your reservation has been saved"))
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_click_and_displayed() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("POST"))
        .and(path(session_path("elements")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "value": [{ ELEMENT_KEY: "e7" }] })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(session_path("element/e7/displayed")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": true })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(session_path("element/e7/click")))
        .and(body_json(json!({})))
        .respond_with(ok_null())
        .expect(1)
        .mount(&server)
        .await;

    let found = session
        .find_elements(&Locator::css("#btnSaveReservation"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert!(session.is_displayed(&found[0]).await.unwrap());
    session.click(&found[0]).await.unwrap();
}

#[tokio::test]
async fn test_find_child_option() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("POST"))
        .and(path(session_path("element")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "value": { ELEMENT_KEY: "sel" } })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(session_path("element/sel/element")))
        .and(body_json(json!({ "using": "css selector", "value": "option[value=\"1/5/2025\"]" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "value": { ELEMENT_KEY: "opt" } })),
        )
        .mount(&server)
        .await;

    let select = session.find_element(&Locator::css("#ddlDates")).await.unwrap();
    let option = session
        .find_child(&select, &Locator::css("option[value=\"1/5/2025\"]"))
        .await
        .unwrap();
    assert_eq!(option.id(), "opt");
}

// ── Screenshots ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_screenshot_decodes_base64() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    // "\x89PNG" base64-encoded
    Mock::given(method("GET"))
        .and(path(session_path("screenshot")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "iVBORw==" })))
        .mount(&server)
        .await;

    let png = session.screenshot().await.unwrap();
    assert_eq!(png, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_screenshot_rejects_garbage() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("GET"))
        .and(path(session_path("screenshot")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "***" })))
        .mount(&server)
        .await;

    let result = session.screenshot().await;
    assert!(matches!(result, Err(Error::Screenshot(_))), "got: {result:?}");
}

#[tokio::test]
async fn test_non_json_error_body_is_previewed() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("POST"))
        .and(path(session_path("url")))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let target = Url::parse("https://club.example/").unwrap();
    match session.navigate(&target).await {
        Err(Error::WebDriver { error, message, status }) => {
            assert_eq!(error, "unknown error");
            assert_eq!(message, "Bad Gateway");
            assert_eq!(status, 502);
        }
        other => panic!("expected WebDriver error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_select_option_falls_back_to_label() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("POST"))
        .and(path(session_path("element")))
        .and(body_json(json!({ "using": "css selector", "value": "#cboSearByTimeList" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "value": { ELEMENT_KEY: "times" } })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(session_path("element/times/element")))
        .and(body_json(json!({ "using": "css selector", "value": "option[value=\"08:00 PM\"]" })))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "value": { "error": "no such element", "message": "no option" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(session_path("element/times/element")))
        .and(body_json(json!({
            "using": "xpath",
            "value": "./option[normalize-space(.)='08:00 PM']"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "value": { ELEMENT_KEY: "eight" } })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(session_path("element/eight/click")))
        .respond_with(ok_null())
        .expect(1)
        .mount(&server)
        .await;

    session
        .select_option(&Locator::css("#cboSearByTimeList"), "08:00 PM")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_select_option_reports_missing_option() {
    let (server, client) = setup().await;
    let session = open_session(&server, &client).await;

    Mock::given(method("POST"))
        .and(path(session_path("element")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "value": { ELEMENT_KEY: "dur" } })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(session_path("element/dur/element")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "value": { "error": "no such element", "message": "no option" }
        })))
        .mount(&server)
        .await;

    let result = session
        .select_option(&Locator::css("#ddlDuration"), "45")
        .await;
    match result {
        Err(Error::NoSuchOption { select, value }) => {
            assert_eq!(select, "#ddlDuration");
            assert_eq!(value, "45");
        }
        other => panic!("expected NoSuchOption, got: {other:?}"),
    }
}
