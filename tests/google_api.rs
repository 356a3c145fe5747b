mod common;

use assert_matches::assert_matches;
use imageset_sync::{
    apps_script::{ScriptClient, FORM_SCRIPT_FUNCTION},
    google::{ApiClient, Error},
    images::ImageTable,
    registry,
    sheets::SheetsClient,
};
use serde_json::json;

use common::FakeServer;

fn http() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn api(server: &FakeServer) -> ApiClient {
    ApiClient::new(http(), &server.url, "ya29.test".to_string())
}

#[tokio::test]
async fn registry_listing() {
    let listing = std::fs::read_to_string(common::TAG_LISTING).unwrap();
    let server = FakeServer::start(200, &listing).await;

    let images = registry::list_images(&http(), &server.url, "x86_64")
        .await
        .expect("no errors");

    let table = ImageTable::from_records(&images);
    assert_eq!(
        table.rows(),
        vec![
            vec!["imageId", "name", "manifestDigest", "size", "lastModified"],
            vec![
                "1b9e7d4c3a",
                "4.11.28",
                "sha256:85238bc3eddb88e958535597dbe8ec6f2aa88aa1713c2e1ee7faf88d1fefdac0",
                "463518210",
                "Wed, 08 Feb 2023 09:12:11 -0000",
            ],
            vec![
                "6a1c3b5f2e",
                "4.12.3",
                "sha256:382f271581b9b907484d552bd145e9a5678e9366330059d31b007f4445d99e36",
                "486372517",
                "Tue, 14 Feb 2023 17:43:30 -0000",
            ],
        ]
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
}

#[tokio::test]
async fn registry_error_status() {
    let server = FakeServer::start(503, r#"{"error": "unavailable"}"#).await;

    assert_matches!(
        registry::list_images(&http(), &server.url, "x86_64").await,
        Err(registry::Error::Status { status, body, .. }) if status == 503 && body.contains("unavailable")
    );
}

#[tokio::test]
async fn registry_malformed_body() {
    let server = FakeServer::start(200, "<html>maintenance</html>").await;

    assert_matches!(
        registry::list_images(&http(), &server.url, "x86_64").await,
        Err(registry::Error::DecodeListing(_))
    );
}

#[tokio::test]
async fn update_values() {
    let server = FakeServer::start(
        200,
        r#"{"spreadsheetId": "sheet-1", "totalUpdatedRows": 1, "totalUpdatedCells": 5}"#,
    )
    .await;
    let sheets = SheetsClient::new(api(&server));

    let res = sheets
        .update_values("sheet-1", "imageSets", &ImageTable::from_records(&[]))
        .await
        .expect("no errors");
    assert_eq!(res.total_updated_rows, 1);
    assert_eq!(res.total_updated_cells, 5);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/v4/spreadsheets/sheet-1/values:batchUpdate");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer ya29.test"));
    assert_eq!(
        requests[0].json(),
        json!({
            "valueInputOption": "RAW",
            "data": [{
                "range": "imageSets!A1:E1",
                "majorDimension": "ROWS",
                "values": [["imageId", "name", "manifestDigest", "size", "lastModified"]]
            }]
        })
    );
}

#[tokio::test]
async fn sort_rows() {
    let server = FakeServer::start(200, r#"{"spreadsheetId": "sheet-1", "replies": [{}]}"#).await;
    let sheets = SheetsClient::new(api(&server));

    let res = sheets.sort_rows("sheet-1", 0).await.expect("no errors");
    assert_eq!(res.spreadsheet_id, "sheet-1");

    let requests = server.requests();
    assert_eq!(requests[0].path, "/v4/spreadsheets/sheet-1:batchUpdate");
    assert_eq!(
        requests[0].json()["requests"][0]["sortRange"]["sortSpecs"],
        json!([{"dimensionIndex": 1, "sortOrder": "DESCENDING"}])
    );
}

#[tokio::test]
async fn sheets_permission_denied() {
    let server = FakeServer::start(
        403,
        r#"{"error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}}"#,
    )
    .await;
    let sheets = SheetsClient::new(api(&server));

    assert_matches!(
        sheets.sort_rows("sheet-1", 0).await,
        Err(Error::Status { status, body, .. }) if status == 403 && body.contains("PERMISSION_DENIED")
    );
}

#[tokio::test]
async fn run_form_script() {
    let server = FakeServer::start(
        200,
        r#"{"done": true, "response": {"@type": "type.googleapis.com/google.apps.script.v1.ExecutionResponse"}}"#,
    )
    .await;
    let script = ScriptClient::new(api(&server));

    let op = script
        .run_function("script-1", FORM_SCRIPT_FUNCTION)
        .await
        .expect("no errors");
    assert!(op.done);

    let requests = server.requests();
    assert_eq!(requests[0].path, "/v1/scripts/script-1:run");
    assert_eq!(requests[0].json(), json!({"function": "main"}));
}

#[tokio::test]
async fn form_script_failure() {
    let server = FakeServer::start(
        200,
        r#"{"done": true, "error": {"code": 3, "message": "ScriptError", "details": [{"errorMessage": "Exception: Form not found"}]}}"#,
    )
    .await;
    let script = ScriptClient::new(api(&server));

    assert_matches!(
        script.run_function("script-1", FORM_SCRIPT_FUNCTION).await,
        Err(Error::ScriptExecution { function, message })
            if function == "main" && message == "ScriptError: Exception: Form not found"
    );
}
