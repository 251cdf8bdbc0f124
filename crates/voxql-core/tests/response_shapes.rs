//! JSON shape tests for the response types exposed over HTTP.

use pretty_assertions::assert_eq;
use serde_json::json;
use voxql_core::ResultSet;
use voxql_core::responses::{ErrorResponse, QueryResponse, UploadResponse};

#[test]
fn upload_with_speech_is_locked() {
    let response = UploadResponse::new("audio_1700000000.webm", " show all engineers ");
    assert!(response.locked);
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "success": true,
            "filename": "audio_1700000000.webm",
            "transcription": " show all engineers ",
            "locked": true
        })
    );
}

#[test]
fn upload_with_blank_transcript_is_unlocked() {
    assert!(!UploadResponse::new("a.webm", "").locked);
    assert!(!UploadResponse::new("a.webm", "  \n\t").locked);
}

#[test]
fn query_response_embeds_rows() {
    let results = ResultSet::from_rows(vec!["name".into()], vec![vec![json!("Alice")]]).unwrap();
    let response = QueryResponse::new("SELECT name FROM employees".into(), results);

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "success": true,
            "sql": "SELECT name FROM employees",
            "results": [{"name": "Alice"}]
        })
    );
}

#[test]
fn error_response_omits_missing_filename() {
    let value = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
    assert_eq!(value, json!({"success": false, "error": "boom"}));

    let value = serde_json::to_value(ErrorResponse::new("boom").with_filename("x.wav")).unwrap();
    assert_eq!(value["filename"], json!("x.wav"));
}
