use anyhow::Result;
use axum::Router;
use podcast_generator::{
    controllers::podcast::PodcastController,
    domain::{
        audio::AudioGenerator,
        content::{Chunker, LengthPlanner},
        podcast::{service::DEFAULT_MIN_CONTENT_LENGTH, PodcastService},
        script::{ChunkFailurePolicy, GenerationMode, ScriptGenerator},
    },
    infrastructure::{
        audio::AudioConcatenator,
        extraction::WebExtractor,
        http::build_router,
        repositories::{
            AnthropicTextRepository, PollyTtsRepository, TextGenerationRepository,
            ToneTtsRepository, TtsRepository,
        },
        storage::MediaStore,
    },
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod api_client;
pub mod aws_mocks;
pub mod fixtures;
pub mod mock_upstream;

use api_client::TestClient;
use mock_upstream::{start_upstream, UpstreamState};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Which parts of the pipeline the app under test is wired with
#[derive(Debug, Clone, Copy)]
pub struct TestOptions {
    /// Anthropic repository pointed at the local upstream
    pub text_backend: bool,
    /// Tone generator after the (always failing) Polly backend
    pub tone_fallback: bool,
    pub mode: GenerationMode,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            text_backend: true,
            tone_fallback: true,
            mode: GenerationMode::Chunked,
        }
    }
}

pub struct TestContext {
    pub client: TestClient,
    /// Base URL of the fake web site and generation API
    pub upstream_url: String,
    pub upstream: Arc<UpstreamState>,
    pub audio_dir: PathBuf,
    _files: TempDir,
}

impl TestContext {
    pub async fn new(options: TestOptions) -> Result<Self> {
        let (upstream_url, upstream) = start_upstream().await;

        let files = tempfile::tempdir()?;
        let audio_dir = files.path().join("static/audio");
        let store = MediaStore::new(files.path().join("uploads"), audio_dir.clone());
        store.ensure_dirs().await?;

        let app = create_app(options, &upstream_url, store, &audio_dir).await?;

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        Ok(Self {
            client: TestClient::new(&base_url),
            upstream_url,
            upstream,
            audio_dir,
            _files: files,
        })
    }

    pub fn upstream(&self, path: &str) -> String {
        format!("{}{}", self.upstream_url, path)
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            TestContext::new(TestOptions::default())
                .await
                .expect("Failed to create test context")
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Temp folders are removed when `_files` drops
        }
    }
}

async fn create_app(
    options: TestOptions,
    upstream_url: &str,
    store: MediaStore,
    audio_dir: &Path,
) -> Result<Router> {
    let text_backend = options.text_backend.then(|| {
        Arc::new(
            AnthropicTextRepository::new("test-key".to_string(), "claude-test".to_string())
                .with_api_url(format!("{}/v1/messages", upstream_url)),
        ) as Arc<dyn TextGenerationRepository>
    });

    let polly_client = Arc::new(aws_mocks::create_unreachable_polly_client().await);
    let mut tts_chain: Vec<Arc<dyn TtsRepository>> =
        vec![Arc::new(PollyTtsRepository::new(polly_client))];
    if options.tone_fallback {
        tts_chain.push(Arc::new(ToneTtsRepository::new()));
    }

    let script_generator = Arc::new(ScriptGenerator::new(
        text_backend,
        LengthPlanner::standard(),
        Chunker::default(),
        options.mode,
        ChunkFailurePolicy::DropAndContinue,
    ));
    let audio_generator = Arc::new(AudioGenerator::new(
        tts_chain,
        AudioConcatenator::without_ffmpeg(),
        Duration::ZERO,
    ));
    let podcast_service = Arc::new(PodcastService::new(
        script_generator,
        audio_generator,
        Arc::new(store),
        DEFAULT_MIN_CONTENT_LENGTH,
    ));
    let podcast_controller = Arc::new(PodcastController::new(
        podcast_service.clone(),
        Arc::new(WebExtractor::new()?),
    ));

    Ok(build_router(
        podcast_service,
        podcast_controller,
        audio_dir,
        MAX_UPLOAD_BYTES,
    ))
}
