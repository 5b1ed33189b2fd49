use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use paperforge::application::services::{ExtractionService, GenerationService};
use paperforge::infrastructure::llm::{DefaultLlmClientFactory, create_image_generator};
use paperforge::infrastructure::observability::{TracingConfig, init_tracing};
use paperforge::infrastructure::text_processing::ExtractorFactory;
use paperforge::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(&TracingConfig::default().with_json(settings.logging.json));
    tracing::info!(
        environment = %environment,
        model = %settings.gemini.model,
        max_upload_mb = settings.extraction.max_upload_mb,
        "Configuration loaded"
    );

    let http_client = reqwest::Client::builder()
        .user_agent(concat!("paperforge/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let file_loader = Arc::new(ExtractorFactory::create(&settings.extraction));
    let client_factory = Arc::new(DefaultLlmClientFactory::new(
        http_client.clone(),
        &settings.gemini,
        settings.openai.clone(),
    ));
    let image_generator = Arc::new(create_image_generator(http_client, &settings.gemini));

    let extraction_service = Arc::new(ExtractionService::new(
        file_loader,
        Arc::clone(&client_factory),
        settings.extraction.max_prompt_chars,
    ));
    let generation_service = Arc::new(GenerationService::new(client_factory, image_generator));

    let state = AppState::new(
        extraction_service,
        generation_service,
        settings.max_upload_bytes(),
    );
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
