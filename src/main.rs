use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use saas_dashboard::application::services::{
    AccountService, ChatRelayService, DashboardService, HistoryService, IdentityGuard,
};
use saas_dashboard::infrastructure::auth::{BcryptPasswordHasher, JwtTokenSigner};
use saas_dashboard::infrastructure::llm::AnthropicClient;
use saas_dashboard::infrastructure::observability::{TracingConfig, init_tracing};
use saas_dashboard::infrastructure::persistence::{
    PgConversationRepository, PgUserRepository, create_pool, run_migrations,
};
use saas_dashboard::infrastructure::rate_limit::RateLimitSweeper;
use saas_dashboard::presentation::{AppState, RateLimiters, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (environment, settings) = Settings::load()?;

    init_tracing(
        TracingConfig::from_settings(environment, &settings.logging),
        settings.server.port,
    );

    settings.validate()?;

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    if settings.database.run_migrations {
        tracing::info!("Running database migrations...");
        run_migrations(&pool).await?;
        tracing::info!("Migrations complete.");
    }

    let conversations = Arc::new(PgConversationRepository::new(pool.clone()));
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let signer = Arc::new(JwtTokenSigner::new(&settings.auth.jwt_secret));
    let hasher = Arc::new(BcryptPasswordHasher::new(settings.auth.bcrypt_cost));
    let llm_client = Arc::new(AnthropicClient::new(&settings.llm)?);

    let account_service = Arc::new(AccountService::new(
        users,
        hasher,
        signer.clone(),
        settings.auth.token_ttl(),
    ));
    let chat_relay_service = Arc::new(ChatRelayService::new(conversations.clone(), llm_client));
    let history_service = Arc::new(HistoryService::new(conversations));
    let rate_limiters = RateLimiters::from_settings(&settings.rate_limits);

    let shutdown = CancellationToken::new();
    let sweeper = RateLimitSweeper::new(
        rate_limiters.all(),
        Duration::from_secs(settings.rate_limits.sweep_interval_seconds),
    )
    .spawn(shutdown.clone());

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;

    let state = AppState {
        account_service,
        chat_relay_service,
        history_service,
        dashboard_service: Arc::new(DashboardService::new()),
        identity_guard: Arc::new(IdentityGuard::new(signer)),
        rate_limiters,
        settings: Arc::new(settings),
    };

    let router = create_router(state);

    tracing::info!(%addr, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
    .await?;

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "Rate limit sweeper ended abnormally");
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        }
        _ = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}
