use console_gate::{
    AppState, PolicyTable, SessionStore,
    config::{AppConfig, Env},
    create_router,
    storage::{FileStore, StorageState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point for the gate, responsible for initializing all
/// core components: Configuration, Logging, Session Storage, Policy Table, and the
/// HTTP Server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    // Loads .env file settings before configuration can be read.
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Prioritizes the RUST_LOG environment variable, falling back to sensible
    // defaults for local development.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "console_gate=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            // LOCAL: Pretty print output for human readability during debugging.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON format output for ingestion by centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Gate starting in {:?} mode", config.env);

    // 4. Session Storage Initialization (file-backed)
    // Opens the durable key-value file that mirrors the session fields across
    // restarts. A corrupt file aborts startup rather than silently dropping the
    // persisted session.
    let file_store = FileStore::open(&config.session_path)
        .await
        .expect("FATAL: Failed to open session storage. Check SESSION_STORE_PATH.");
    let storage = Arc::new(file_store) as StorageState;

    // 5. Session Store Initialization
    // Seeds the in-memory identity from the persisted fields (empty when absent).
    let session = Arc::new(SessionStore::initialize(storage).await);

    // 6. Policy Table Declaration
    // The static per-route access policy, declared once at startup.
    let policies = Arc::new(PolicyTable::console_routes());

    // 7. Unified State Assembly
    let app_state = AppState {
        session,
        policies,
        config: config.clone(),
    };

    // 8. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("FATAL: Failed to bind listener. Check BIND_ADDR.");

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on {}", config.bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: /swagger-ui");

    axum::serve(listener, app).await.unwrap();
}
