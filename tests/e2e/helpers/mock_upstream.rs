use super::fixtures::{article_html, pdf_bytes, short_html, MOCK_SCRIPT, STREAMED_SCRIPT};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Streamed responses are cut into frames this small, splitting multi-byte
/// characters between frames
const STREAM_FRAME_BYTES: usize = 5;

/// Requests the fake Anthropic endpoint received
#[derive(Default)]
pub struct UpstreamState {
    pub generation_requests: Mutex<Vec<Value>>,
    /// Answer streaming calls with an error event after the first delta
    pub fail_streams: AtomicBool,
}

impl UpstreamState {
    pub fn fail_streams(&self) {
        self.fail_streams.store(true, Ordering::SeqCst);
    }

    pub fn generation_calls(&self) -> usize {
        self.generation_requests.lock().len()
    }
}

/// One local server standing in for both the web pages we extract from and
/// the Anthropic Messages API
pub async fn start_upstream() -> (String, Arc<UpstreamState>) {
    let state = Arc::new(UpstreamState::default());

    let app = Router::new()
        .route("/article", get(|| async { Html(article_html()) }))
        .route("/short", get(|| async { Html(short_html()) }))
        .route("/paper.pdf", get(serve_pdf))
        .route("/v1/messages", post(messages))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream listener");
    let addr = listener.local_addr().expect("Failed to get upstream addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

async fn serve_pdf() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/pdf")], pdf_bytes())
}

async fn messages(
    State(state): State<Arc<UpstreamState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if headers.get("x-api-key").is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"type": "error", "error": {"type": "authentication_error", "message": "missing key"}})),
        )
            .into_response();
    }

    let stream = body.get("stream").and_then(Value::as_bool).unwrap_or(false);
    state.generation_requests.lock().push(body);

    if !stream {
        return Json(json!({
            "id": "msg_test",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": MOCK_SCRIPT}],
        }))
        .into_response();
    }

    let mut events = String::from("event: message_start\ndata: {\"type\":\"message_start\"}\n\n");
    for word in STREAMED_SCRIPT.split_inclusive(' ') {
        let delta = json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": word}});
        events.push_str(&format!("event: content_block_delta\ndata: {}\n\n", delta));
        if state.fail_streams.load(Ordering::SeqCst) {
            let error = json!({"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}});
            events.push_str(&format!("event: error\ndata: {}\n\n", error));
            break;
        }
    }
    events.push_str("event: message_stop\ndata: {\"type\":\"message_stop\"}\n\n");

    let frames: Vec<Result<Bytes, Infallible>> = events
        .as_bytes()
        .chunks(STREAM_FRAME_BYTES)
        .map(|frame| Ok(Bytes::copy_from_slice(frame)))
        .collect();

    (
        [(header::CONTENT_TYPE, "text/event-stream")],
        Body::from_stream(futures::stream::iter(frames)),
    )
        .into_response()
}
