use crate::e2e::helpers;

use helpers::fixtures::{pdf_bytes, MOCK_SCRIPT, STREAMED_SCRIPT};
use helpers::{TestContext, TestOptions};
use hyper::StatusCode;
use podcast_generator::domain::script::GenerationMode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_podcast_from_url(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/generate", &json!({ "source": ctx.upstream("/article") }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("success").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(response.str_field("script"), Some(MOCK_SCRIPT));
    assert_eq!(response.str_field("source_type"), Some("URL"));
    assert_eq!(response.str_field("content_type"), Some("general"));
    assert_eq!(response.str_field("length_tier"), Some("short"));
    assert_eq!(
        body.get("script_length").and_then(|v| v.as_u64()),
        Some(MOCK_SCRIPT.chars().count() as u64)
    );
    assert!(body.get("content_length").and_then(|v| v.as_u64()).unwrap() >= 100);
    assert_eq!(ctx.upstream.generation_calls(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_send_page_chrome_to_the_backend(ctx: &TestContext) {
    ctx.client
        .post("/generate", &json!({ "source": ctx.upstream("/article") }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let requests = ctx.upstream.generation_requests.lock();
    let prompt = requests[0]["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("Rivers begin as small streams"));
    assert!(!prompt.contains("window.analytics"));
    assert!(!prompt.contains("Copyright 2024"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fall_back_to_tone_audio_when_polly_fails(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/generate", &json!({ "source": ctx.upstream("/article") }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let audio_url = response.str_field("audio_url").expect("Missing audio_url");
    assert!(audio_url.starts_with("/static/audio/podcast_"));
    assert!(audio_url.ends_with(".wav"));
    assert!(response.str_field("audio_error").is_none());
    let warning = response.str_field("audio_warning").expect("Missing audio_warning");
    assert!(warning.contains("placeholder tone"));

    let filename = audio_url.trim_start_matches("/static/audio/");
    assert!(ctx.audio_dir.join(filename).exists());

    // The saved file is served back
    let audio = ctx.client.get(audio_url).await.unwrap();
    audio.assert_status(StatusCode::OK);
    assert_eq!(&audio.body_bytes[0..4], b"RIFF");
    assert_eq!(&audio.body_bytes[8..12], b"WAVE");
}

#[tokio::test]
async fn it_should_return_script_with_audio_error_when_only_tts_backend_fails() {
    let ctx = TestContext::new(TestOptions {
        tone_fallback: false,
        ..TestOptions::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/generate", &json!({ "source": ctx.upstream("/article") }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.str_field("script"), Some(MOCK_SCRIPT));
    assert!(response.str_field("audio_url").is_none());

    let audio_error = response.str_field("audio_error").expect("Missing audio_error");
    assert!(!audio_error.is_empty());
    assert!(audio_error.contains("polly"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_podcast_from_pdf_upload(ctx: &TestContext) {
    let response = ctx
        .client
        .post_file("/generate", "file", "rivers.pdf", "application/pdf", &pdf_bytes())
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.str_field("source_type"), Some("PDF Upload"));
    assert_eq!(response.str_field("script"), Some(MOCK_SCRIPT));

    let requests = ctx.upstream.generation_requests.lock();
    let prompt = requests[0]["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("Rivers begin as small streams"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_extract_pdf_served_from_url(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/generate", &json!({ "source": ctx.upstream("/paper.pdf") }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.str_field("source_type"), Some("URL"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_non_pdf_upload(ctx: &TestContext) {
    let response = ctx
        .client
        .post_file("/generate", "file", "notes.txt", "text/plain", b"just some notes")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid file type");
    assert_eq!(ctx.upstream.generation_calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_upload_without_file_field(ctx: &TestContext) {
    let response = ctx
        .client
        .post_file("/generate", "document", "rivers.pdf", "application/pdf", &pdf_bytes())
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("No file provided");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_invalid_url(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/generate", &json!({ "source": "ftp://example.com/paper" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("invalid URL");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_page_with_too_little_content(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/generate", &json!({ "source": ctx.upstream("/short") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("sufficient content");
    assert_eq!(ctx.upstream.generation_calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unreachable_page(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/generate", &json!({ "source": ctx.upstream("/missing") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("failed to fetch");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unsupported_content_type(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/generate", "text/plain", "https://example.com")
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_json_without_source(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/generate", &json!({ "url": "https://example.com" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn it_should_fail_when_no_generation_backend_is_configured() {
    let ctx = TestContext::new(TestOptions {
        text_backend: false,
        ..TestOptions::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/generate", &json!({ "source": ctx.upstream("/article") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("No text generation backend configured");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_backend_answer_on_test_api(ctx: &TestContext) {
    let response = ctx.client.get("/test-api").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.str_field("status"), Some("success"));
    assert_eq!(response.str_field("response"), Some(MOCK_SCRIPT));

    let requests = ctx.upstream.generation_requests.lock();
    assert_eq!(requests[0]["max_tokens"], json!(10));
    assert_eq!(requests[0]["messages"][0]["content"], json!("Say hello"));
}

#[tokio::test]
async fn it_should_report_error_on_test_api_without_backend() {
    let ctx = TestContext::new(TestOptions {
        text_backend: false,
        ..TestOptions::default()
    })
    .await
    .unwrap();

    let response = ctx.client.get("/test-api").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.str_field("status"), Some("error"));
    assert!(response.str_field("error").is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_audio_file(ctx: &TestContext) {
    let response = ctx
        .client
        .get("/static/audio/podcast_does_not_exist.mp3")
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn it_should_join_streamed_script_in_single_pass_mode() {
    let ctx = TestContext::new(TestOptions {
        mode: GenerationMode::SinglePass,
        ..TestOptions::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/generate", &json!({ "source": ctx.upstream("/article") }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.str_field("script"), Some(STREAMED_SCRIPT));

    let requests = ctx.upstream.generation_requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["stream"], json!(true));
}

#[tokio::test]
async fn it_should_fail_when_stream_reports_an_error() {
    let ctx = TestContext::new(TestOptions {
        mode: GenerationMode::SinglePass,
        ..TestOptions::default()
    })
    .await
    .unwrap();
    ctx.upstream.fail_streams();

    let response = ctx
        .client
        .post("/generate", &json!({ "source": ctx.upstream("/article") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Overloaded");
}
