use pretty_assertions::assert_eq;
use serde_json::json;
use voxql_config::{SpeechConfig, SpeechProvider};
use voxql_speech::{SpeechError, Transcriber, create_transcriber};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> SpeechConfig {
    SpeechConfig {
        provider: SpeechProvider::Remote,
        base_url: server.uri(),
        api_key: "stt-key".into(),
        ..SpeechConfig::default()
    }
}

fn audio_file(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("audio_1700000000.webm");
    std::fs::write(&path, b"\x1a\x45\xdf\xa3 fake webm").unwrap();
    path
}

#[tokio::test]
async fn uploads_audio_and_returns_trimmed_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(header("authorization", "Bearer stt-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "text": "  Show me all engineers.  " })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let transcriber = create_transcriber(&config(&server)).unwrap();
    let text = transcriber.transcribe(&audio_file(dir.path())).await.unwrap();

    assert_eq!(text, "Show me all engineers.");
}

#[tokio::test]
async fn empty_text_means_no_speech() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let transcriber = create_transcriber(&config(&server)).unwrap();
    assert_eq!(transcriber.transcribe(&audio_file(dir.path())).await.unwrap(), "");
}

#[tokio::test]
async fn error_status_is_a_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(415).set_body_string("unsupported media"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let transcriber = create_transcriber(&config(&server)).unwrap();
    let err = transcriber
        .transcribe(&audio_file(dir.path()))
        .await
        .unwrap_err();

    match err {
        SpeechError::Remote { status, message } => {
            assert_eq!(status, 415);
            assert_eq!(message, "unsupported media");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_audio_file_is_io_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let transcriber = create_transcriber(&config(&server)).unwrap();

    let err = transcriber
        .transcribe(&dir.path().join("absent.wav"))
        .await
        .unwrap_err();
    assert!(matches!(err, SpeechError::Io(_)));
}
