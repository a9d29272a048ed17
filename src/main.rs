use std::sync::Arc;

use ad_studio::{handlers, AppConfig, AppState, CampaignClient, WorkflowOrchestrator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging()?;

    // A missing backend URL is fatal at startup, never a workflow error
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ {}", e);
            tracing::info!("Set BACKEND_URL in the environment, .env, or the secrets file (SECRETS_PATH)");
            return Err(e.into());
        }
    };

    tracing::info!("Using backend URL: {}", config.base_url);
    tracing::info!(
        "Timeouts - images: {}s, videos: {}s, download: {}s",
        config.image_timeout.as_secs(),
        config.video_timeout.as_secs(),
        config.download_timeout.as_secs()
    );

    let bind_addr = config.bind_addr.clone();
    let shared_state = Arc::new(AppState {
        orchestrator: WorkflowOrchestrator::new(Arc::new(CampaignClient::new()), config),
    });

    let app = handlers::app_router(shared_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service_with_connect_info::<std::net::SocketAddr>()).await?;

    Ok(())
}

/// Filter used when RUST_LOG is unset
fn default_log_filter(debug_build: bool) -> &'static str {
    if debug_build {
        "info,ad_studio=debug"
    } else {
        "info,reqwest=warn,hyper=warn"
    }
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, fmt, Layer};

    let log_level = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| default_log_filter(cfg!(debug_assertions)).to_string());
    let env_filter = EnvFilter::try_new(&log_level)?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(true).with_line_number(true).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("🎬 AI Ad Studio {} starting up (log level: {})", env!("CARGO_PKG_VERSION"), log_level);
    Ok(())
}
