use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;
use voxql_config::{LlmConfig, LlmProvider};
use voxql_lake::QueryExecutor;
use voxql_llm::{LlmClient, LlmError, Prompt};
use voxql_pipeline::{Pipeline, SqlGenerator};
use voxql_server::{AppState, build_router};
use voxql_speech::{SpeechError, Transcriber};

const BOUNDARY: &str = "voxql-test-boundary";
const SCHEMA: &str =
    "TABLE employees (id INTEGER, name VARCHAR, position VARCHAR, salary INTEGER);";

struct CountingLlm {
    reply: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl LlmClient for CountingLlm {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_string())
    }

    fn provider_name(&self) -> &str {
        "counting"
    }
}

struct StubTranscriber(Option<&'static str>);

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, SpeechError> {
        assert!(audio_path.is_file(), "audio should be stored before transcription");
        self.0
            .map(str::to_string)
            .ok_or_else(|| SpeechError::Decode("unsupported codec".into()))
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

struct Harness {
    app: Router,
    llm: Arc<CountingLlm>,
    dir: tempfile::TempDir,
}

impl Harness {
    fn new(transcript: Option<&'static str>, reply: &'static str) -> Self {
        Self::with_limit(transcript, reply, 1024 * 1024)
    }

    fn with_limit(transcript: Option<&'static str>, reply: &'static str, limit: usize) -> Self {
        let llm = Arc::new(CountingLlm {
            reply,
            calls: AtomicUsize::new(0),
        });
        let shared = Arc::clone(&llm);
        Self::build(transcript, limit, llm, move |executor| {
            SqlGenerator::new(shared as Arc<dyn LlmClient>, executor, SCHEMA)
        })
    }

    /// A server whose LLM provider has no base URL configured.
    fn without_llm(transcript: Option<&'static str>) -> Self {
        let llm = Arc::new(CountingLlm {
            reply: "",
            calls: AtomicUsize::new(0),
        });
        let config = LlmConfig {
            provider: LlmProvider::OpenaiCompatible,
            base_url: String::new(),
            ..LlmConfig::default()
        };
        Self::build(transcript, 1024 * 1024, llm, move |executor| {
            SqlGenerator::from_llm_config(config, executor, SCHEMA)
        })
    }

    fn build(
        transcript: Option<&'static str>,
        limit: usize,
        llm: Arc<CountingLlm>,
        generator: impl FnOnce(Arc<QueryExecutor>) -> SqlGenerator,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("employees.csv");
        std::fs::write(
            &csv,
            "id,name,position,salary\n1,Alice,Eng,60000\n2,Bob,Eng,40000\n",
        )
        .unwrap();

        let executor = Arc::new(QueryExecutor::open_in_memory(&csv, "employees").unwrap());
        let pipeline = Pipeline::new(Arc::new(StubTranscriber(transcript)), generator(executor));
        let state = AppState::new(Arc::new(pipeline), dir.path().join("audio"));

        Self {
            app: build_router(state, limit),
            llm,
            dir,
        }
    }

    fn llm_calls(&self) -> usize {
        self.llm.calls.load(Ordering::SeqCst)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}

fn multipart(uri: &str, field: &str, file_name: Option<&str>, bytes: &[u8]) -> Request<Body> {
    let disposition = file_name.map_or_else(
        || format!("form-data; name=\"{field}\""),
        |name| format!("form-data; name=\"{field}\"; filename=\"{name}\""),
    );
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

fn json_post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_service() {
    let harness = Harness::new(Some(""), "");
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = harness.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "voxql");
}

#[tokio::test]
async fn silent_upload_is_not_locked_and_skips_llm() {
    let harness = Harness::new(Some(""), "```sql\nSELECT 1\n```");

    let (status, body) = harness
        .send(multipart("/upload", "file", Some("take.wav"), b"RIFF...."))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["transcription"], "");
    assert_eq!(body["locked"], false);
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.starts_with("audio_") && filename.ends_with(".wav"), "{filename}");
    assert!(harness.dir.path().join("audio").join(filename).is_file());
    assert_eq!(harness.llm_calls(), 0);
}

#[tokio::test]
async fn spoken_upload_is_locked() {
    let harness = Harness::new(Some(" Show me all engineers."), "");

    let (status, body) = harness
        .send(multipart("/upload", "file", Some("blob"), b"opus bytes"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcription"], " Show me all engineers.");
    assert_eq!(body["locked"], true);
    assert!(body["filename"].as_str().unwrap().ends_with(".webm"));
}

#[tokio::test]
async fn failed_transcription_reports_filename() {
    let harness = Harness::new(None, "");

    let (status, body) = harness
        .send(multipart("/upload", "file", Some("take.ogg"), b"????"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("unsupported codec"));
    assert!(body["filename"].as_str().unwrap().ends_with(".ogg"));
    assert!(body.get("transcription").is_none());
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let harness = Harness::new(Some("hi"), "");

    let (status, body) = harness
        .send(multipart("/upload", "audio", Some("take.wav"), b"data"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let harness = Harness::with_limit(Some("hi"), "", 64);

    let (status, body) = harness
        .send(multipart("/upload", "file", Some("big.wav"), &[0u8; 4096]))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn upload_that_is_not_multipart_is_rejected() {
    let harness = Harness::new(Some("hi"), "");
    let request = json_post("/upload", &json!({ "file": "nope" }));

    let (status, body) = harness.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("invalid upload request"));
}

#[tokio::test]
async fn query_without_text_field_gets_error_body() {
    let harness = Harness::new(Some(""), "```sql\nSELECT 1\n```");

    let (status, body) = harness
        .send(json_post("/query", &json!({ "prompt": "x" })))
        .await;

    assert!(status.is_client_error(), "{status}");
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("text"));
    assert_eq!(harness.llm_calls(), 0);
}

#[tokio::test]
async fn query_without_json_content_type_gets_error_body() {
    let harness = Harness::new(Some(""), "");
    let request = Request::builder()
        .method("POST")
        .uri("/query")
        .body(Body::from(r#"{"text":"everyone"}"#))
        .unwrap();

    let (status, body) = harness.send(request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn oversized_query_gets_error_body() {
    let harness = Harness::with_limit(Some(""), "", 64);
    let text = "x".repeat(1024);

    let (status, body) = harness
        .send(json_post("/query", &json!({ "text": text })))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn unconfigured_llm_still_serves_uploads() {
    let harness = Harness::without_llm(Some("show everyone"));

    let (status, body) = harness
        .send(multipart("/upload", "file", Some("take.wav"), b"RIFF"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["locked"], true);

    let (status, body) = harness
        .send(json_post("/query", &json!({ "text": "show everyone" })))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("SQL generation failed")
    );
}

#[tokio::test]
async fn query_returns_sql_and_rows() {
    let harness = Harness::new(
        Some(""),
        "```sql\nSELECT name FROM employees WHERE salary > 50000\n```",
    );

    let (status, body) = harness
        .send(json_post("/query", &json!({ "text": "who earns over 50k" })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "sql": "SELECT name FROM employees WHERE salary > 50000",
            "results": [{ "name": "Alice" }],
        })
    );
}

#[tokio::test]
async fn query_failure_is_500_with_stage_message() {
    let harness = Harness::new(Some(""), "Sorry, I can't help with that.");

    let (status, body) = harness
        .send(json_post("/query", &json!({ "text": "anything" })))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("SQL extraction failed")
    );
}

#[tokio::test]
async fn bad_sql_surfaces_engine_error() {
    let harness = Harness::new(Some(""), "```sql\nSELEKT * FORM employees\n```");

    let (status, body) = harness
        .send(json_post("/query", &json!({ "text": "everyone" })))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("syntax error"));
}

#[tokio::test]
async fn voice_query_runs_whole_pipeline() {
    let harness = Harness::new(
        Some("how many engineers"),
        "```sql\nSELECT count(*) AS n FROM employees WHERE position = 'Eng'\n```",
    );

    let (status, body) = harness
        .send(multipart("/voice-query", "file", Some("q.wav"), b"RIFF"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["transcription"], "how many engineers");
    assert_eq!(body["results"], json!([{ "n": 2 }]));
    assert_eq!(harness.llm_calls(), 1);
}

#[tokio::test]
async fn voice_query_failure_keeps_filename() {
    let harness = Harness::new(None, "");

    let (status, body) = harness
        .send(multipart("/voice-query", "file", Some("q.wav"), b"RIFF"))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("transcription failed"));
    assert!(body["filename"].as_str().unwrap().ends_with(".wav"));
    assert_eq!(harness.llm_calls(), 0);
}
