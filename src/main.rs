use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use cardsmith::application::ports::{AudioProcessor, DeckExporter};
use cardsmith::application::services::{CardService, TranscriptionService};
use cardsmith::infrastructure::audio::{
    SymphoniaAudioProcessor, TranscriptionEngineFactory, TranscriptionProvider,
};
use cardsmith::infrastructure::export::AnkiExporter;
use cardsmith::infrastructure::llm::{GeminiCardGenerator, SentenceSplitGenerator};
use cardsmith::infrastructure::observability::{TracingConfig, init_tracing};
use cardsmith::presentation::{
    AppState, Environment, Settings, TranscriptionProviderSetting, create_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let settings = Settings::load(environment)?;

    init_tracing(
        TracingConfig::new(
            environment.to_string(),
            settings.logging.json_format,
            settings.logging.directives.clone(),
        ),
        settings.server.port,
    );

    let audio: Arc<dyn AudioProcessor> = Arc::new(SymphoniaAudioProcessor::new());

    let provider = match settings.transcription.provider {
        TranscriptionProviderSetting::Local => TranscriptionProvider::Local,
        TranscriptionProviderSetting::OpenAi => TranscriptionProvider::OpenAi,
    };

    let engine = TranscriptionEngineFactory::create(
        provider,
        &settings.transcription.model,
        settings.transcription.api_key.clone(),
        settings.transcription.base_url.clone(),
        Arc::clone(&audio),
    )?;

    let gemini_key = settings
        .cards
        .api_key
        .clone()
        .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
        .unwrap_or_default();

    if gemini_key.is_empty() {
        tracing::warn!(
            "No Gemini API key configured; card generation will fail over to the sentence splitter"
        );
    }

    let primary = Arc::new(GeminiCardGenerator::new(
        gemini_key,
        settings.cards.model.clone(),
        None,
    ));
    let fallback = Arc::new(SentenceSplitGenerator::new());

    let transcription_service = Arc::new(TranscriptionService::new(engine, audio));
    let card_service = Arc::new(CardService::new(primary, fallback));
    let deck_exporter: Arc<dyn DeckExporter> = Arc::new(AnkiExporter::new());

    let state = AppState {
        transcription_service,
        card_service,
        deck_exporter,
        settings: settings.clone(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
