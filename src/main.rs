use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use podcast_generator::controllers::podcast::PodcastController;
use podcast_generator::domain::audio::AudioGenerator;
use podcast_generator::domain::content::{Chunker, LengthPlanner};
use podcast_generator::domain::podcast::PodcastService;
use podcast_generator::domain::script::ScriptGenerator;
use podcast_generator::infrastructure::audio::AudioConcatenator;
use podcast_generator::infrastructure::config::{Config, GenerationProvider, LogFormat, TtsProvider};
use podcast_generator::infrastructure::extraction::WebExtractor;
use podcast_generator::infrastructure::http::start_http_server;
use podcast_generator::infrastructure::repositories::{
    AnthropicTextRepository, NativeTtsRepository, OpenAiTextRepository, OpenAiTtsRepository,
    PollyTtsRepository, TextGenerationRepository, ToneTtsRepository, TtsRepository,
};
use podcast_generator::infrastructure::storage::MediaStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Podcast Generator on {}:{}",
        config.host,
        config.port
    );

    // Output folders
    let store = MediaStore::new(config.upload_folder.clone(), config.audio_folder.clone());
    store.ensure_dirs().await?;
    tracing::info!(
        upload_folder = %config.upload_folder.display(),
        audio_folder = %config.audio_folder.display(),
        "Output folders ready"
    );

    let openai_client = config.openai_api_key.as_ref().map(|api_key| {
        Arc::new(async_openai::Client::with_config(
            async_openai::config::OpenAIConfig::new().with_api_key(api_key),
        ))
    });

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let text_backend: Option<Arc<dyn TextGenerationRepository>> = match config.generation_provider {
        GenerationProvider::OpenAi => openai_client.clone().map(|client| {
            Arc::new(OpenAiTextRepository::new(client, config.generation_model.clone()))
                as Arc<dyn TextGenerationRepository>
        }),
        GenerationProvider::Anthropic => config.anthropic_api_key.clone().map(|api_key| {
            Arc::new(AnthropicTextRepository::new(api_key, config.generation_model.clone()))
                as Arc<dyn TextGenerationRepository>
        }),
    };
    match &text_backend {
        Some(backend) => tracing::info!(
            provider = backend.name(),
            model = backend.model(),
            "Text generation backend configured"
        ),
        None => tracing::warn!(
            provider = ?config.generation_provider,
            "No API key for the text generation backend, /generate will fail"
        ),
    }

    let tts_chain = build_tts_chain(&config, openai_client).await;
    tracing::info!(
        backends = ?tts_chain.iter().map(|b| b.name()).collect::<Vec<_>>(),
        "TTS chain configured"
    );

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let planner = LengthPlanner::for_profile(
        config.length_profile,
        config.length_tier_breakpoints.clone(),
    )?;
    let chunker = Chunker::new(
        config.max_chunk_size,
        config.paragraph_threshold,
        config.chunk_overlap,
    );
    let script_generator = Arc::new(ScriptGenerator::new(
        text_backend,
        planner,
        chunker,
        config.generation_mode,
        config.chunk_failure_policy,
    )
    .with_max_output_tokens(config.max_output_tokens));
    let audio_generator = Arc::new(AudioGenerator::new(
        tts_chain,
        AudioConcatenator::with_system_ffmpeg(),
        Duration::from_millis(config.tts_retry_delay_ms),
    ));
    let podcast_service = Arc::new(PodcastService::new(
        script_generator,
        audio_generator,
        Arc::new(store),
        config.min_content_length,
    ));

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let web_extractor = Arc::new(WebExtractor::new()?);
    let podcast_controller = Arc::new(PodcastController::new(
        podcast_service.clone(),
        web_extractor,
    ));

    // Start HTTP server with all routes
    start_http_server(Arc::new(config), podcast_service, podcast_controller).await?;

    Ok(())
}

/// Primary cloud voice first, then the local fallbacks
async fn build_tts_chain(
    config: &Config,
    openai_client: Option<Arc<async_openai::Client<async_openai::config::OpenAIConfig>>>,
) -> Vec<Arc<dyn TtsRepository>> {
    let mut chain: Vec<Arc<dyn TtsRepository>> = Vec::new();

    match config.tts_provider {
        TtsProvider::OpenAi => match openai_client {
            Some(client) => chain.push(Arc::new(OpenAiTtsRepository::new(
                client,
                config.openai_tts_model.clone(),
                config.openai_tts_voice.clone(),
            ))),
            None => tracing::warn!("TTS_PROVIDER is openai but OPENAI_API_KEY is not set"),
        },
        TtsProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
            let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
            if !has_access_key || !has_secret_key {
                tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
            }

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
            chain.push(Arc::new(PollyTtsRepository::new(polly_client)));
        }
        TtsProvider::None => {}
    }

    if config.native_tts_enabled {
        match NativeTtsRepository::detect() {
            Some(native) => chain.push(Arc::new(native)),
            None => tracing::info!("No native speech engine found on PATH"),
        }
    }

    if config.tone_fallback_enabled {
        chain.push(Arc::new(ToneTtsRepository::new()));
    }

    chain
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "podcast_generator=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "podcast_generator=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
