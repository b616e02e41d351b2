use feedback_api::api::AppState;
use feedback_api::config::AppConfig;
use feedback_api::generation::FeedbackGenerator;
use feedback_api::llm::OpenAiClient;
use feedback_api::storage::SubmissionLog;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting Review Feedback API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Model: {}", config.llm.model);
    info!("   - Provider: {}", config.llm.base_url);
    info!("   - Max submissions: {}", config.storage.max_submissions);
    info!("   - Server: {}:{}", config.server.host, config.server.port);
    if config.llm.api_key.is_empty() {
        warn!("⚠️  OPENAI_API_KEY is not set; submissions will fail until it is");
    }

    // Initialize model client
    let client = OpenAiClient::new(&config.llm)?;
    info!("🧠 Model client ready ({})", client.model());

    // Initialize in-memory submission log
    let submissions = Arc::new(SubmissionLog::new(config.storage.max_submissions));
    info!("💾 Submission log ready (capacity {})", submissions.capacity());

    // Create application state
    let state = AppState {
        generator: FeedbackGenerator::new(Arc::new(client)),
        submissions,
    };

    let app = feedback_api::router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET  /                 - Service status");
    info!("   POST /api/submit       - Submit rating and review");
    info!("   GET  /api/submissions  - List submissions with stats");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
