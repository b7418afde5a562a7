//! Registry Steward - Main Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use registry_steward::{
    api,
    config::Config,
    error::Result,
    services::{
        notification_service::NotificationService, queue_service::QueueService,
        register_service::RegisterService, registry_service::RegistryService,
        workflow_service::WorkflowService,
    },
    telemetry,
    vcs::{RepoLocks, RepositoryFactory},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    telemetry::init_tracing();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Starting Registry Steward");

    // Prepare the canonical repository and the submissions queue
    let factory = Arc::new(RepositoryFactory::new(&config));
    factory.ensure_master()?;

    let queue = QueueService::new(&config.submissions_dir);
    queue.ensure_dir().await?;

    let locks = Arc::new(RepoLocks::new());

    let notifier = Arc::new(NotificationService::from_env());
    if notifier.is_configured() {
        tracing::info!("Notification relay configured");
    } else {
        tracing::info!("Notification relay not configured, dispatch disabled");
    }

    let workflow = Arc::new(WorkflowService::new(
        factory.clone(),
        locks,
        notifier.clone(),
        config.notifications.clone(),
    ));
    let registry = RegistryService::new(factory.master_workdir());
    let register = Arc::new(RegisterService::new(
        queue,
        registry,
        notifier,
        config.notifications.clone(),
    ));

    // Create application state
    let state = Arc::new(api::AppState::new(config.clone(), workflow, register));

    // Build router
    let app = Router::new()
        .merge(api::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.bind_address.parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
