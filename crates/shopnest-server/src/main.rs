use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

mod adapters;
mod app;
mod application;
mod config;
mod error;
mod lifecycle;
mod middleware;
mod models;
mod routes;

#[cfg(test)]
mod testing;

use adapters::{OpenRouterProvider, PgConversationRepository, PgFaqRepository};
use app::AppState;
use application::ChatService;
use config::ServerConfig;
use lifecycle::Shutdown;
use middleware::FixedWindowLimiter;
use shopnest::PromptBuilder;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,shopnest_server=debug,tower_http=info")),
        )
        .init();
    lifecycle::install_panic_hook();

    tracing::info!("🛒 ShopNest chatbot initializing...");

    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    let platform = config::load_platform_info(&config.platform_info_path)
        .context("Failed to load platform info")?;
    tracing::info!("📦 Platform info loaded for {}", platform.name);

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("✅ Database migrations completed");

    let provider = OpenRouterProvider::new(&config.provider)
        .context("Failed to initialize completion provider")?;
    tracing::info!(
        model = %config.provider.model,
        "🤖 Completion provider initialized (OpenRouter)"
    );

    let chat_service = Arc::new(ChatService::new(
        Arc::new(PgFaqRepository::new(pool.clone())),
        Arc::new(PgConversationRepository::new(pool)),
        Arc::new(provider),
        PromptBuilder::new(Arc::new(platform), config.prompt_limits),
    ));

    let shutdown = Shutdown::new();
    let limiter = Arc::new(FixedWindowLimiter::new(
        config.ingress.rate_limit_max,
        config.ingress.rate_limit_window,
    ));
    let sweeper = middleware::spawn_sweeper(limiter.clone(), SWEEP_INTERVAL);
    tokio::spawn(lifecycle::supervise(shutdown.clone(), "rate-limit-sweeper", sweeper));

    let router = app::build_router(AppState { chat_service }, &config.ingress, limiter);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ ShopNest chatbot listening on {}", config.bind_addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.clone().signalled())
    .await
    .context("Server error")?;

    if shutdown.is_fatal() {
        tracing::error!("Server stopped after a fatal error");
        std::process::exit(1);
    }

    tracing::info!("👋 ShopNest chatbot stopped");
    Ok(())
}
